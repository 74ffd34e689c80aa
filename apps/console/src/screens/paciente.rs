use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use derive_more::Display;
use inquire::{Confirm, Select, Text};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use appointment_cell::models::{Appointment, AppointmentStatus, BookAppointmentRequest};
use auth_cell::guard::GuardState;
use auth_cell::models::UpdateProfileRequest;
use shared_models::auth::Role;

use crate::menu::{Menu, MenuExit, MENU_EXIT, MENU_LOOP};
use crate::screens::{auth_token, optional, pick, session_user_id};
use crate::services::Services;

pub struct PacienteMenu<'srv> {
    pub services: &'srv Services,
}

#[async_trait]
impl Menu for PacienteMenu<'_> {
    async fn enter(&mut self) -> Result<MenuExit> {
        match self.services.guard.evaluate(Role::Paciente) {
            GuardState::Allowed => {}
            GuardState::Denied => {
                eprintln!("Access denied: the patient area requires the PACIENTE role.");
                return Ok(MENU_EXIT);
            }
            GuardState::RedirectToLogin | GuardState::Loading => {
                eprintln!("Please sign in first.");
                return Ok(MENU_EXIT);
            }
        }

        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Book an appointment")]
            Book,
            #[display("My appointments")]
            Appointments,
            #[display("Cancel an appointment")]
            Cancel,
            #[display("Edit my profile")]
            EditProfile,
            #[display("Back")]
            Back,
        }

        let choice = Select::new("Patient", Choice::iter().collect()).prompt()?;

        match choice {
            Choice::Book => {
                self.book_appointment().await?;
                Ok(MENU_LOOP)
            }
            Choice::Appointments => {
                self.list_appointments().await?;
                Ok(MENU_LOOP)
            }
            Choice::Cancel => {
                self.cancel_appointment().await?;
                Ok(MENU_LOOP)
            }
            Choice::EditProfile => {
                self.edit_profile().await?;
                Ok(MENU_LOOP)
            }
            Choice::Back => Ok(MENU_EXIT),
        }
    }
}

impl PacienteMenu<'_> {
    async fn book_appointment(&self) -> Result<()> {
        let token = auth_token(self.services)?;
        let patient_id = session_user_id(self.services)?;

        // Doctors and own profile load together before the form opens.
        let form = self
            .services
            .booking
            .prepare_form(patient_id, &token)
            .await?;

        println!("Booking for {}.", form.patient.full_name());

        let Some(doctor) = pick("Doctor:", form.doctors, |d| {
            format!("{} ({})", d.full_name(), d.specialty)
        })?
        else {
            return Ok(());
        };

        let raw_when = Text::new("Date and time (YYYY-MM-DD HH:MM):").prompt()?;
        let scheduled_at = NaiveDateTime::parse_from_str(raw_when.trim(), "%Y-%m-%d %H:%M")
            .map_err(|_| anyhow!("Date must look like 2025-06-01 14:30"))?
            .and_utc();

        let reason = Text::new("Reason for the visit:").prompt()?;

        let outcome = self
            .services
            .booking
            .book(
                BookAppointmentRequest {
                    patient_id,
                    doctor_id: doctor.id,
                    scheduled_at,
                    reason,
                },
                &token,
            )
            .await?;

        println!(
            "Appointment booked with {} for {}.",
            doctor.full_name(),
            outcome.appointment.scheduled_at.format("%Y-%m-%d %H:%M")
        );
        println!("You now have {} appointment(s) on file.", outcome.agenda.len());
        Ok(())
    }

    async fn list_appointments(&self) -> Result<()> {
        let appointments = self.my_appointments().await?;

        for appointment in &appointments {
            println!(
                "  {}  {}  {:<9}  {}",
                appointment.id,
                appointment.scheduled_at.format("%Y-%m-%d %H:%M"),
                appointment.status.to_string(),
                appointment.reason
            );
        }
        println!("{} appointment(s).", appointments.len());

        Ok(())
    }

    async fn cancel_appointment(&self) -> Result<()> {
        let token = auth_token(self.services)?;
        let cancellable: Vec<Appointment> = self
            .my_appointments()
            .await?
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .collect();

        let Some(appointment) = pick("Appointment to cancel:", cancellable, |a| {
            format!(
                "{} | {}",
                a.scheduled_at.format("%Y-%m-%d %H:%M"),
                a.reason
            )
        })?
        else {
            return Ok(());
        };

        let confirmed = Confirm::new("Cancel this appointment?")
            .with_default(false)
            .prompt()?;

        if confirmed {
            let canceled = self
                .services
                .appointments
                .cancel(appointment.id, &token)
                .await?;
            println!("Appointment {} is now {}.", canceled.id, canceled.status);
        }
        Ok(())
    }

    async fn edit_profile(&self) -> Result<()> {
        let request = UpdateProfileRequest {
            name: optional(Text::new("Name (empty keeps current):").prompt()?),
            email: optional(Text::new("Email (empty keeps current):").prompt()?),
            phone: optional(Text::new("Phone (empty keeps current):").prompt()?),
        };

        let session = self.services.auth.update_profile(request).await?;
        println!("Profile saved for {}.", session.display_name());
        Ok(())
    }

    async fn my_appointments(&self) -> Result<Vec<Appointment>> {
        let token = auth_token(self.services)?;
        let patient_id = session_user_id(self.services)?;
        Ok(self
            .services
            .appointments
            .for_patient(patient_id, &token)
            .await?)
    }
}
