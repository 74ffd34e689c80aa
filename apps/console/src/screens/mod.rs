pub mod admin;
pub mod login;
pub mod medico;
pub mod paciente;

use anyhow::{anyhow, Result};
use inquire::Select;
use uuid::Uuid;

use shared_models::auth::Role;

use crate::services::Services;

/// Map a navigation path to the role subtree guarding it. Anything else is
/// a not-found.
pub fn route_for(path: &str) -> Option<Role> {
    let path = path.trim();
    let in_subtree = |root: &str| path == root || path.starts_with(&format!("{}/", root));

    if in_subtree("/admin") {
        Some(Role::Admin)
    } else if in_subtree("/medico") {
        Some(Role::Medico)
    } else if in_subtree("/paciente") {
        Some(Role::Paciente)
    } else {
        None
    }
}

pub fn auth_token(services: &Services) -> Result<String> {
    services
        .auth
        .token()
        .ok_or_else(|| anyhow!("No active session"))
}

pub fn session_user_id(services: &Services) -> Result<Uuid> {
    let session = services
        .auth
        .current()
        .ok_or_else(|| anyhow!("No active session"))?;

    Uuid::parse_str(&session.user_id)
        .map_err(|_| anyhow!("Session user id is not a valid identifier"))
}

/// Empty input on an edit form means "leave unchanged".
pub fn optional(input: String) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Present a list and return the chosen item, or nothing when the list is
/// empty.
pub fn pick<T>(prompt: &str, items: Vec<T>, label: impl Fn(&T) -> String) -> Result<Option<T>> {
    if items.is_empty() {
        println!("Nothing to select.");
        return Ok(None);
    }

    let labels: Vec<String> = items.iter().map(&label).collect();
    let index = Select::new(prompt, labels).raw_prompt()?.index;
    Ok(items.into_iter().nth(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_subtrees_resolve_to_their_guard_role() {
        assert_eq!(route_for("/admin"), Some(Role::Admin));
        assert_eq!(route_for("/admin/doctors"), Some(Role::Admin));
        assert_eq!(route_for("/medico"), Some(Role::Medico));
        assert_eq!(route_for("/paciente/citas"), Some(Role::Paciente));
    }

    #[test]
    fn unmatched_paths_are_not_found() {
        assert_eq!(route_for("/"), None);
        assert_eq!(route_for("/administrator"), None);
        assert_eq!(route_for("/pacientes"), None);
        assert_eq!(route_for("nonsense"), None);
    }

    #[test]
    fn optional_treats_blank_as_unchanged() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional("x".to_string()), Some("x".to_string()));
    }
}
