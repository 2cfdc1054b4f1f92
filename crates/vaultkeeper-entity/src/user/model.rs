//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered user of the vault.
///
/// Password storage and verification live in the external identity store;
/// this row only carries what the authorization core needs. Users are never
/// physically scrubbed from history: deleting a user removes this row (and
/// with it login capability) while audit entries and old grant references
/// keep the id as a dangling reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address (unique).
    pub email: String,
    /// Global role.
    pub role: UserRole,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Check if this user has global admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email address (must be unique).
    pub email: String,
    /// Assigned global role.
    pub role: UserRole,
}
