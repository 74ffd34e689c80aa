use anyhow::Result;
use async_trait::async_trait;
use derive_more::Display;
use dotenv::dotenv;
use inquire::{Select, Text};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod menu;
mod screens;
mod services;

use auth_cell::guard::GuardState;
use shared_config::AppConfig;
use shared_models::auth::Role;

use crate::menu::{Menu, MenuExit, MENU_EXIT, MENU_LOOP};
use crate::screens::admin::AdminMenu;
use crate::screens::medico::MedicoMenu;
use crate::screens::paciente::PacienteMenu;
use crate::screens::{login, route_for};
use crate::services::Services;

pub struct App {
    services: Services,
}

impl App {
    pub fn new(services: Services) -> Self {
        App { services }
    }

    pub async fn start(&mut self) -> Result<()> {
        println!("Clinic scheduling console.");
        self.enter_loop().await;
        Ok(())
    }

    /// Open a role subtree. The guard decides what actually renders.
    async fn open_area(&self, role: Role) {
        match self.services.guard.evaluate(role) {
            GuardState::Allowed => match role {
                Role::Admin => {
                    let mut menu = AdminMenu {
                        services: &self.services,
                    };
                    menu.enter_loop().await;
                }
                Role::Medico => {
                    let mut menu = MedicoMenu {
                        services: &self.services,
                    };
                    menu.enter_loop().await;
                }
                Role::Paciente => {
                    let mut menu = PacienteMenu {
                        services: &self.services,
                    };
                    menu.enter_loop().await;
                }
            },
            GuardState::Denied => {
                eprintln!("Access denied: your role cannot open the {} area.", role);
            }
            GuardState::RedirectToLogin => {
                eprintln!("Please sign in first.");
            }
            GuardState::Loading => {
                eprintln!("Session still resolving, try again.");
            }
        }
    }
}

#[derive(Display)]
enum Choice {
    #[display("Sign in")]
    Login,
    #[display("Open my dashboard")]
    Dashboard,
    #[display("Go to path")]
    GoTo,
    #[display("Log out")]
    Logout,
    #[display("Quit")]
    Exit,
}

#[async_trait]
impl Menu for App {
    async fn enter(&mut self) -> Result<MenuExit> {
        let choices = if self.services.auth.is_logged_in() {
            vec![Choice::Dashboard, Choice::GoTo, Choice::Logout, Choice::Exit]
        } else {
            vec![Choice::Login, Choice::Exit]
        };

        let choice = Select::new("What would you like to do?", choices).prompt()?;

        match choice {
            Choice::Login => {
                if let Some(role) = login::prompt_login(&self.services).await? {
                    self.open_area(role).await;
                }
                Ok(MENU_LOOP)
            }
            Choice::Dashboard => {
                match self.services.auth.role() {
                    Some(role) => self.open_area(role).await,
                    None => eprintln!("Please sign in first."),
                }
                Ok(MENU_LOOP)
            }
            Choice::GoTo => {
                let path = Text::new("Path:").prompt()?;
                match route_for(&path) {
                    Some(role) => self.open_area(role).await,
                    None => println!("Not found: no screen at {}.", path.trim()),
                }
                Ok(MENU_LOOP)
            }
            Choice::Logout => {
                self.services.auth.logout()?;
                println!("Signed out.");
                Ok(MENU_LOOP)
            }
            Choice::Exit => Ok(MENU_EXIT),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduling console");

    let config = AppConfig::from_env();
    let services = Services::new(&config);

    // Seed in-memory state from the session store, once.
    services.auth.restore();

    let mut app = App::new(services);
    app.start().await
}
