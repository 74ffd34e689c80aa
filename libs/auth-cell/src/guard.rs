use std::sync::Arc;

use tracing::debug;

use shared_models::auth::Role;
use shared_utils::jwt;

use crate::context::AuthContext;

/// Observable outcome of a navigation attempt into a role-gated subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session not yet resolved from the store.
    Loading,
    /// Not logged in, or the stored token has expired.
    RedirectToLogin,
    /// Logged in with a different role.
    Denied,
    /// Render the protected children.
    Allowed,
}

/// Gate in front of each role subtree. Evaluation reads the live auth
/// context every time; prior decisions are never cached.
pub struct RouteGuard {
    context: Arc<AuthContext>,
}

impl RouteGuard {
    pub fn new(context: Arc<AuthContext>) -> Self {
        Self { context }
    }

    pub fn evaluate(&self, required: Role) -> GuardState {
        if !self.context.is_resolved() {
            return GuardState::Loading;
        }

        let session = match self.context.current() {
            Some(session) => session,
            None => return GuardState::RedirectToLogin,
        };

        if jwt::is_expired(&session.token) {
            debug!("Stored token expired, routing to login");
            return GuardState::RedirectToLogin;
        }

        if session.role != required {
            debug!(
                "Access denied: role {} cannot enter the {} area",
                session.role, required
            );
            return GuardState::Denied;
        }

        GuardState::Allowed
    }
}
