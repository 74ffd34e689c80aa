use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::auth::{Profile, Role, Session};
use shared_models::error::ApiError;

use crate::models::{LoginResponse, UpdateProfileRequest};
use crate::storage::SessionStore;

/// In-memory view of the session store, shared by every screen and by the
/// route guard. The session is only ever written by login/logout (and the
/// profile patch), never concurrently.
pub struct AuthContext {
    api: Arc<ApiClient>,
    store: SessionStore,
    session: RwLock<Option<Session>>,
    resolved: AtomicBool,
}

impl AuthContext {
    pub fn new(config: &AppConfig, api: Arc<ApiClient>) -> Self {
        Self {
            api,
            store: SessionStore::new(config),
            session: RwLock::new(None),
            resolved: AtomicBool::new(false),
        }
    }

    fn session_read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.session.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session_write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// One-shot read of the session store to seed in-memory state. Until
    /// this has run the context is unresolved and the guard reports LOADING.
    pub fn restore(&self) {
        let stored = self.store.load();
        if let Some(session) = &stored {
            debug!("Restored session for user {} ({})", session.user_id, session.role);
        }

        *self.session_write() = stored;
        self.resolved.store(true, Ordering::SeqCst);
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }

    /// Authenticate against the backend. On success the whole session is
    /// replaced in one assignment, so consumers never observe a partially
    /// written state.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Role, String), ApiError> {
        debug!("Logging in {}", email);

        let response: LoginResponse = self
            .api
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;

        let role: Role = response.role.parse().map_err(ApiError::Decode)?;

        let session = Session {
            token: response.token,
            role,
            user_id: response.user_id,
            profile: Profile {
                name: response.name,
                email: response.email,
                phone: response.phone,
                document: response.document,
                specialty: response.specialty,
            },
        };

        self.store.save(&session)?;
        let name = session.profile.name.clone();

        *self.session_write() = Some(session);
        self.resolved.store(true, Ordering::SeqCst);

        info!("Login succeeded for {} as {}", email, role);
        Ok((role, name))
    }

    /// Clears the session unconditionally, in memory first so consumers see
    /// the logout even if removing the file fails.
    pub fn logout(&self) -> Result<(), ApiError> {
        *self.session_write() = None;
        let result = self.store.clear();
        info!("Session cleared");
        result
    }

    /// Derived, never stored redundantly.
    pub fn is_logged_in(&self) -> bool {
        self.session_read().is_some()
    }

    pub fn current(&self) -> Option<Session> {
        self.session_read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session_read().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.session_read().as_ref().map(|s| s.role)
    }

    /// Save the logged-in user's own profile, then patch the live session
    /// with the saved fields and re-persist it.
    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<Session, ApiError> {
        let mut session = self.current().ok_or_else(|| ApiError::Api {
            status: 401,
            message: "No active session".to_string(),
        })?;

        let mut update_data = serde_json::Map::new();
        if let Some(name) = &request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(email) = &request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(phone) = &request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }

        let path = format!("/users/{}", session.user_id);
        self.api
            .request_no_content(
                Method::PUT,
                &path,
                Some(&session.token),
                Some(serde_json::Value::Object(update_data)),
            )
            .await?;

        if let Some(name) = request.name {
            session.profile.name = name;
        }
        if let Some(email) = request.email {
            session.profile.email = Some(email);
        }
        if let Some(phone) = request.phone {
            session.profile.phone = Some(phone);
        }

        self.store.save(&session)?;
        *self.session_write() = Some(session.clone());

        info!("Profile updated for user {}", session.user_id);
        Ok(session)
    }
}
