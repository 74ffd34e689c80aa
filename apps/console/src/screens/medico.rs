use anyhow::Result;
use async_trait::async_trait;
use derive_more::Display;
use inquire::{Select, Text};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use appointment_cell::models::{Appointment, AppointmentStatus};
use auth_cell::guard::GuardState;
use history_cell::models::SaveClinicalRecordRequest;
use shared_models::auth::Role;

use crate::menu::{Menu, MenuExit, MENU_EXIT, MENU_LOOP};
use crate::screens::{auth_token, pick, session_user_id};
use crate::services::Services;

pub struct MedicoMenu<'srv> {
    pub services: &'srv Services,
}

#[async_trait]
impl Menu for MedicoMenu<'_> {
    async fn enter(&mut self) -> Result<MenuExit> {
        match self.services.guard.evaluate(Role::Medico) {
            GuardState::Allowed => {}
            GuardState::Denied => {
                eprintln!("Access denied: the physician area requires the MEDICO role.");
                return Ok(MENU_EXIT);
            }
            GuardState::RedirectToLogin | GuardState::Loading => {
                eprintln!("Please sign in first.");
                return Ok(MENU_EXIT);
            }
        }

        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("My agenda")]
            Agenda,
            #[display("Record clinical history")]
            RecordHistory,
            #[display("Complete appointment")]
            Complete,
            #[display("Export appointment report")]
            ExportReport,
            #[display("Back")]
            Back,
        }

        let choice = Select::new("Physician", Choice::iter().collect()).prompt()?;

        match choice {
            Choice::Agenda => {
                self.show_agenda().await?;
                Ok(MENU_LOOP)
            }
            Choice::RecordHistory => {
                self.record_history().await?;
                Ok(MENU_LOOP)
            }
            Choice::Complete => {
                self.complete_appointment().await?;
                Ok(MENU_LOOP)
            }
            Choice::ExportReport => {
                self.export_report().await?;
                Ok(MENU_LOOP)
            }
            Choice::Back => Ok(MENU_EXIT),
        }
    }
}

impl MedicoMenu<'_> {
    async fn my_appointments(&self) -> Result<Vec<Appointment>> {
        let token = auth_token(self.services)?;
        let doctor_id = session_user_id(self.services)?;
        Ok(self.services.appointments.for_doctor(doctor_id, &token).await?)
    }

    async fn show_agenda(&self) -> Result<()> {
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

    async fn record_history(&self) -> Result<()> {
        let token = auth_token(self.services)?;
        let appointments = self.my_appointments().await?;

        let Some(appointment) = pick("Appointment:", appointments, appointment_label)? else {
            return Ok(());
        };

        // Prefill from the existing record so a second save edits, not
        // overwrites blindly.
        let existing = self
            .services
            .history
            .get_for_appointment(appointment.id, &token)
            .await?;

        let (observations_seed, prescription_seed) = match &existing {
            Some(record) => (record.observations.clone(), record.prescription.clone()),
            None => (String::new(), String::new()),
        };

        let request = SaveClinicalRecordRequest {
            observations: Text::new("Observations:")
                .with_initial_value(&observations_seed)
                .prompt()?,
            prescription: Text::new("Prescription:")
                .with_initial_value(&prescription_seed)
                .prompt()?,
        };

        let record = self
            .services
            .history
            .save(appointment.id, request, &token)
            .await?;

        println!("Clinical record {} saved.", record.id);
        Ok(())
    }

    async fn complete_appointment(&self) -> Result<()> {
        let token = auth_token(self.services)?;
        let scheduled: Vec<Appointment> = self
            .my_appointments()
            .await?
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .collect();

        let Some(appointment) = pick("Appointment to complete:", scheduled, appointment_label)?
        else {
            return Ok(());
        };

        let completed = self
            .services
            .appointments
            .complete(appointment.id, &token)
            .await?;

        println!("Appointment {} is now {}.", completed.id, completed.status);
        Ok(())
    }

    async fn export_report(&self) -> Result<()> {
        let token = auth_token(self.services)?;
        let appointments = self.my_appointments().await?;

        let Some(appointment) = pick("Appointment:", appointments, appointment_label)? else {
            return Ok(());
        };

        let default_name = format!("report-{}.pdf", appointment.id);
        let file_name = Text::new("Save as:")
            .with_initial_value(&default_name)
            .prompt()?;

        let bytes = self
            .services
            .history
            .download_report(appointment.id, &token)
            .await?;

        std::fs::write(&file_name, bytes)?;
        println!("Report written to {}.", file_name);
        Ok(())
    }
}

fn appointment_label(appointment: &Appointment) -> String {
    format!(
        "{} | {} | {}",
        appointment.scheduled_at.format("%Y-%m-%d %H:%M"),
        appointment.status,
        appointment.reason
    )
}
