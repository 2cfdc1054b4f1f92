//! Request context carrying the authenticated acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vaultkeeper_entity::user::{User, UserRole};

/// Context for the current authenticated request.
///
/// Built by the transport layer after authentication and passed into every
/// service method, so each operation knows *who* is acting without reading
/// any ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// The acting user's global role.
    pub role: UserRole,
    /// The acting user's email (convenience field for logging).
    pub email: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, email: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            email: email.into(),
            request_time: Utc::now(),
        }
    }

    /// Creates a context acting as the given user.
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id, user.role, user.email.clone())
    }

    /// Returns whether the acting user is a global admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the acting user is at least a manager.
    pub fn is_manager_or_above(&self) -> bool {
        self.role.is_manager_or_above()
    }
}
