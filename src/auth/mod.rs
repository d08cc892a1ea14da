pub mod password;
mod session;

pub use session::{Session, SessionStore};

use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or invalid session token")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),
}

/// The authenticated caller, attached to requests by the auth middleware.
///
/// Handlers state their required capability explicitly via [`require_role`]
/// rather than relying on route grouping alone.
///
/// [`require_role`]: Identity::require_role
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    /// Check that the caller's role covers `required`.
    pub fn require_role(&self, required: Role) -> Result<(), AuthError> {
        if self.role.covers(required) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(format!(
                "This action requires {} access",
                required
            )))
        }
    }

    /// Shorthand for the admin-only surfaces.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        self.require_role(Role::Admin)
    }
}
