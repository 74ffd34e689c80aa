use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role determines which part of the application a user can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Medico,
    Paciente,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Medico => "MEDICO",
            Role::Paciente => "PACIENTE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Backends are inconsistent about casing, so roles are matched
    /// case-insensitively and always stored uppercased.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "MEDICO" => Ok(Role::Medico),
            "PACIENTE" => Ok(Role::Paciente),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Denormalized profile fields kept alongside the token. Which fields are
/// populated depends on the role (only doctors carry a specialty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub specialty: Option<String>,
}

/// The authenticated user's token, role and profile snapshot. Created
/// wholesale on login and destroyed wholesale on logout; the only partial
/// update it ever receives is a profile-field patch after a profile save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user_id: String,
    pub profile: Profile,
}

impl Session {
    pub fn display_name(&self) -> &str {
        &self.profile.name
    }
}

/// The claims segment of the access token. The client only reads `exp` to
/// decide whether a stored session is still usable; it never verifies the
/// signature because it never holds the secret.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Option<String>,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Medico".parse::<Role>().unwrap(), Role::Medico);
        assert_eq!("PACIENTE".parse::<Role>().unwrap(), Role::Paciente);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_uppercased() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(Role::Paciente.to_string(), "PACIENTE");
    }
}
