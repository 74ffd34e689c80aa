use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::auth::{Profile, Role, Session};
use shared_models::error::ApiError;

/// File-backed session store: the persisted side of the auth context. The
/// session lives in one file as flat string key/value pairs, written
/// wholesale on login and removed wholesale on logout.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            path: PathBuf::from(&config.session_file),
        }
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored session. Anything short of a complete, well-formed
    /// entry set (missing file, stale format, truncated write) yields no
    /// session rather than an error: startup must never fail on this.
    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;

        let entries: BTreeMap<String, String> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Stored session is unreadable, ignoring it: {}", e);
                return None;
            }
        };

        let session = Self::from_entries(&entries);
        if session.is_none() {
            warn!("Stored session is incomplete, ignoring it");
        }
        session
    }

    pub fn save(&self, session: &Session) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ApiError::Storage(e.to_string()))?;
            }
        }

        let entries = Self::to_entries(session);
        let raw = serde_json::to_string_pretty(&entries)
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        fs::write(&self.path, raw).map_err(|e| ApiError::Storage(e.to_string()))?;
        debug!("Session persisted to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    fn to_entries(session: &Session) -> BTreeMap<String, String> {
        let mut entries = BTreeMap::new();
        entries.insert("token".to_string(), session.token.clone());
        entries.insert("role".to_string(), session.role.to_string());
        entries.insert("user_id".to_string(), session.user_id.clone());
        entries.insert("name".to_string(), session.profile.name.clone());

        if let Some(email) = &session.profile.email {
            entries.insert("email".to_string(), email.clone());
        }
        if let Some(phone) = &session.profile.phone {
            entries.insert("phone".to_string(), phone.clone());
        }
        if let Some(document) = &session.profile.document {
            entries.insert("document".to_string(), document.clone());
        }
        if let Some(specialty) = &session.profile.specialty {
            entries.insert("specialty".to_string(), specialty.clone());
        }

        entries
    }

    fn from_entries(entries: &BTreeMap<String, String>) -> Option<Session> {
        let token = entries.get("token")?.clone();
        let role = Role::from_str(entries.get("role")?).ok()?;
        let user_id = entries.get("user_id")?.clone();
        let name = entries.get("name")?.clone();

        Some(Session {
            token,
            role,
            user_id,
            profile: Profile {
                name,
                email: entries.get("email").cloned(),
                phone: entries.get("phone").cloned(),
                document: entries.get("document").cloned(),
                specialty: entries.get("specialty").cloned(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            token: "header.claims.sig".to_string(),
            role: Role::Medico,
            user_id: "u-42".to_string(),
            profile: Profile {
                name: "Dr. Grey".to_string(),
                email: Some("grey@example.com".to_string()),
                phone: None,
                document: Some("MED-7".to_string()),
                specialty: Some("Cardiology".to_string()),
            },
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::at_path(dir.path().join("session.json"))
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let session = sample_session();

        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn missing_file_yields_no_session() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), None);
    }

    #[test]
    fn unreadable_file_yields_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{{{ not json").unwrap();

        assert_eq!(SessionStore::at_path(path).load(), None);
    }

    #[test]
    fn incomplete_entries_yield_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token": "t", "role": "ADMIN"}"#).unwrap();

        assert_eq!(SessionStore::at_path(path).load(), None);
    }

    #[test]
    fn clear_removes_the_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&sample_session()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);

        // Clearing an already-cleared store is not an error.
        store.clear().unwrap();
    }

    #[test]
    fn stored_role_is_uppercased() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::at_path(&path);

        store.save(&sample_session()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"MEDICO\""));
    }
}
