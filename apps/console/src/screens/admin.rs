use anyhow::Result;
use async_trait::async_trait;
use derive_more::Display;
use futures::try_join;
use inquire::{Confirm, Select, Text};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use appointment_cell::models::AppointmentSearchQuery;
use auth_cell::guard::GuardState;
use doctor_cell::models::{CreateDoctorRequest, UpdateDoctorRequest};
use patient_cell::models::{CreatePatientRequest, UpdatePatientRequest};
use shared_models::auth::Role;

use crate::menu::{Menu, MenuExit, MENU_EXIT, MENU_LOOP};
use crate::screens::{auth_token, optional, pick};
use crate::services::Services;

pub struct AdminMenu<'srv> {
    pub services: &'srv Services,
}

#[async_trait]
impl Menu for AdminMenu<'_> {
    async fn enter(&mut self) -> Result<MenuExit> {
        // The guard runs on every pass; a session change mid-visit is
        // honored on the next navigation.
        match self.services.guard.evaluate(Role::Admin) {
            GuardState::Allowed => {}
            GuardState::Denied => {
                eprintln!("Access denied: the administration area requires the ADMIN role.");
                return Ok(MENU_EXIT);
            }
            GuardState::RedirectToLogin | GuardState::Loading => {
                eprintln!("Please sign in first.");
                return Ok(MENU_EXIT);
            }
        }

        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("Clinic overview")]
            Overview,
            #[display("Manage doctors")]
            Doctors,
            #[display("Manage patients")]
            Patients,
            #[display("User accounts")]
            Users,
            #[display("Back")]
            Back,
        }

        let choice = Select::new("Administration", Choice::iter().collect()).prompt()?;

        match choice {
            Choice::Overview => {
                self.show_overview().await?;
                Ok(MENU_LOOP)
            }
            Choice::Doctors => {
                let mut menu = DoctorsMenu {
                    services: self.services,
                };
                menu.enter_loop().await;
                Ok(MENU_LOOP)
            }
            Choice::Patients => {
                let mut menu = PatientsMenu {
                    services: self.services,
                };
                menu.enter_loop().await;
                Ok(MENU_LOOP)
            }
            Choice::Users => {
                self.list_users().await?;
                Ok(MENU_LOOP)
            }
            Choice::Back => Ok(MENU_EXIT),
        }
    }
}

impl AdminMenu<'_> {
    /// Dashboard load: three independent fetches joined any-fail.
    async fn show_overview(&self) -> Result<()> {
        let token = auth_token(self.services)?;

        let (doctors, patients, appointments) = try_join!(
            self.services.doctors.list(&token),
            self.services.patients.list(&token),
            self.services
                .appointments
                .search(AppointmentSearchQuery::default(), &token),
        )?;

        println!("Doctors registered: {}", doctors.len());
        println!("Patients registered: {}", patients.len());
        println!("Appointments on file: {}", appointments.len());

        for appointment in appointments.iter().take(10) {
            println!(
                "  {}  {}  {:<9}  {}",
                appointment.id,
                appointment.scheduled_at.format("%Y-%m-%d %H:%M"),
                appointment.status.to_string(),
                appointment.reason
            );
        }

        Ok(())
    }

    async fn list_users(&self) -> Result<()> {
        let token = auth_token(self.services)?;
        let users = self.services.users.list(&token).await?;

        for user in &users {
            println!("  {}  {:<10}  {}  <{}>", user.id, user.role.to_string(), user.name, user.email);
        }
        println!("{} account(s).", users.len());

        Ok(())
    }
}

struct DoctorsMenu<'srv> {
    services: &'srv Services,
}

#[async_trait]
impl Menu for DoctorsMenu<'_> {
    async fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("List doctors")]
            List,
            #[display("Register doctor")]
            Create,
            #[display("Edit doctor")]
            Edit,
            #[display("Remove doctor")]
            Delete,
            #[display("Back")]
            Back,
        }

        let choice = Select::new("Doctors", Choice::iter().collect()).prompt()?;
        let token = auth_token(self.services)?;

        match choice {
            Choice::List => {
                let doctors = self.services.doctors.list(&token).await?;
                for doctor in &doctors {
                    println!(
                        "  {}  {:<28}  {:<16}  {}",
                        doctor.id,
                        doctor.full_name(),
                        doctor.specialty,
                        doctor.email
                    );
                }
                println!("{} doctor(s).", doctors.len());
                Ok(MENU_LOOP)
            }
            Choice::Create => {
                let request = CreateDoctorRequest {
                    first_name: Text::new("First name:").prompt()?,
                    last_name: Text::new("Last name:").prompt()?,
                    email: Text::new("Email:").prompt()?,
                    phone_number: optional(Text::new("Phone (optional):").prompt()?),
                    document: optional(Text::new("License number (optional):").prompt()?),
                    specialty: Text::new("Specialty:").prompt()?,
                };

                let doctor = self.services.doctors.create(request, &token).await?;
                println!("Doctor {} registered.", doctor.full_name());
                Ok(MENU_LOOP)
            }
            Choice::Edit => {
                let doctors = self.services.doctors.list(&token).await?;
                let Some(doctor) = pick("Doctor:", doctors, |d| {
                    format!("{} ({})", d.full_name(), d.specialty)
                })?
                else {
                    return Ok(MENU_LOOP);
                };

                let request = UpdateDoctorRequest {
                    first_name: optional(Text::new("First name (empty keeps current):").prompt()?),
                    last_name: optional(Text::new("Last name (empty keeps current):").prompt()?),
                    email: optional(Text::new("Email (empty keeps current):").prompt()?),
                    phone_number: optional(Text::new("Phone (empty keeps current):").prompt()?),
                    document: optional(Text::new("License (empty keeps current):").prompt()?),
                    specialty: optional(Text::new("Specialty (empty keeps current):").prompt()?),
                };

                let updated = self.services.doctors.update(doctor.id, request, &token).await?;
                println!("Doctor {} updated.", updated.full_name());
                Ok(MENU_LOOP)
            }
            Choice::Delete => {
                let doctors = self.services.doctors.list(&token).await?;
                let Some(doctor) = pick("Doctor:", doctors, |d| {
                    format!("{} ({})", d.full_name(), d.specialty)
                })?
                else {
                    return Ok(MENU_LOOP);
                };

                let confirmed = Confirm::new(&format!("Remove {}?", doctor.full_name()))
                    .with_default(false)
                    .prompt()?;

                if confirmed {
                    self.services.doctors.delete(doctor.id, &token).await?;
                    println!("Doctor removed.");
                }
                Ok(MENU_LOOP)
            }
            Choice::Back => Ok(MENU_EXIT),
        }
    }
}

struct PatientsMenu<'srv> {
    services: &'srv Services,
}

#[async_trait]
impl Menu for PatientsMenu<'_> {
    async fn enter(&mut self) -> Result<MenuExit> {
        #[derive(EnumIter, Display)]
        enum Choice {
            #[display("List patients")]
            List,
            #[display("Register patient")]
            Create,
            #[display("Edit patient")]
            Edit,
            #[display("Remove patient")]
            Delete,
            #[display("Back")]
            Back,
        }

        let choice = Select::new("Patients", Choice::iter().collect()).prompt()?;
        let token = auth_token(self.services)?;

        match choice {
            Choice::List => {
                let patients = self.services.patients.list(&token).await?;
                for patient in &patients {
                    println!(
                        "  {}  {:<28}  {}",
                        patient.id,
                        patient.full_name(),
                        patient.email
                    );
                }
                println!("{} patient(s).", patients.len());
                Ok(MENU_LOOP)
            }
            Choice::Create => {
                let date_of_birth = optional(Text::new("Date of birth YYYY-MM-DD (optional):").prompt()?)
                    .map(|raw| raw.parse::<chrono::NaiveDate>())
                    .transpose()
                    .map_err(|_| anyhow::anyhow!("Date of birth must be YYYY-MM-DD"))?;

                let request = CreatePatientRequest {
                    first_name: Text::new("First name:").prompt()?,
                    last_name: Text::new("Last name:").prompt()?,
                    email: Text::new("Email:").prompt()?,
                    phone_number: optional(Text::new("Phone (optional):").prompt()?),
                    document: optional(Text::new("Document id (optional):").prompt()?),
                    date_of_birth,
                };

                let patient = self.services.patients.create(request, &token).await?;
                println!("Patient {} registered.", patient.full_name());
                Ok(MENU_LOOP)
            }
            Choice::Edit => {
                let patients = self.services.patients.list(&token).await?;
                let Some(patient) = pick("Patient:", patients, |p| p.full_name())? else {
                    return Ok(MENU_LOOP);
                };

                let request = UpdatePatientRequest {
                    first_name: optional(Text::new("First name (empty keeps current):").prompt()?),
                    last_name: optional(Text::new("Last name (empty keeps current):").prompt()?),
                    email: optional(Text::new("Email (empty keeps current):").prompt()?),
                    phone_number: optional(Text::new("Phone (empty keeps current):").prompt()?),
                    document: optional(Text::new("Document (empty keeps current):").prompt()?),
                    date_of_birth: None,
                };

                let updated = self.services.patients.update(patient.id, request, &token).await?;
                println!("Patient {} updated.", updated.full_name());
                Ok(MENU_LOOP)
            }
            Choice::Delete => {
                let patients = self.services.patients.list(&token).await?;
                let Some(patient) = pick("Patient:", patients, |p| p.full_name())? else {
                    return Ok(MENU_LOOP);
                };

                let confirmed = Confirm::new(&format!("Remove {}?", patient.full_name()))
                    .with_default(false)
                    .prompt()?;

                if confirmed {
                    self.services.patients.delete(patient.id, &token).await?;
                    println!("Patient removed.");
                }
                Ok(MENU_LOOP)
            }
            Choice::Back => Ok(MENU_EXIT),
        }
    }
}
