use anyhow::Result;
use inquire::{Password, PasswordDisplayMode, Text};

use shared_models::auth::Role;

use crate::services::Services;

/// Login screen. A failed attempt shows the normalized error inline and
/// leaves the caller free to prompt again; there is no retry logic here.
pub async fn prompt_login(services: &Services) -> Result<Option<Role>> {
    let email = Text::new("Email:").prompt()?;
    let password = Password::new("Password:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    match services.auth.login(&email, &password).await {
        Ok((role, name)) => {
            println!("Welcome, {}.", name);
            Ok(Some(role))
        }
        Err(error) => {
            eprintln!("Login failed: {error}");
            Ok(None)
        }
    }
}
