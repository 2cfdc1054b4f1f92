//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Well-known audit action codes.
///
/// The `action` column is free text; these constants are the codes the core
/// itself emits.
pub mod actions {
    /// A credential's secret value was revealed.
    pub const CREDENTIAL_VIEW: &str = "CREDENTIAL_VIEW";
    /// A credential was created.
    pub const CREDENTIAL_CREATE: &str = "CREDENTIAL_CREATE";
    /// A credential was updated.
    pub const CREDENTIAL_UPDATE: &str = "CREDENTIAL_UPDATE";
    /// A credential was deleted.
    pub const CREDENTIAL_DELETE: &str = "CREDENTIAL_DELETE";
    /// An application grant was created or replaced.
    pub const PERMISSION_GRANT: &str = "PERMISSION_GRANT";
    /// An application grant was revoked.
    pub const PERMISSION_REVOKE: &str = "PERMISSION_REVOKE";
    /// An application was created.
    pub const APPLICATION_CREATE: &str = "APPLICATION_CREATE";
    /// An application was updated.
    pub const APPLICATION_UPDATE: &str = "APPLICATION_UPDATE";
    /// An application was deleted.
    pub const APPLICATION_DELETE: &str = "APPLICATION_DELETE";
    /// A user account was created.
    pub const USER_CREATE: &str = "USER_CREATE";
    /// A user's global role was changed.
    pub const USER_ROLE_CHANGE: &str = "USER_ROLE_CHANGE";
    /// A user account was deleted.
    pub const USER_DELETE: &str = "USER_DELETE";
}

/// An immutable audit log entry recording a user action.
///
/// Append-only: no update or delete path exists anywhere in the core.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The action code (e.g. `"CREDENTIAL_VIEW"`).
    pub action: String,
    /// The target resource ID (if applicable).
    pub target_id: Option<Uuid>,
    /// The type of target resource (e.g. `"credential"`, `"grant"`).
    pub target_type: Option<String>,
    /// Human-readable details.
    pub details: Option<String>,
    /// When the action occurred.
    pub timestamp: DateTime<Utc>,
}

/// Data required to append a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The action code.
    pub action: String,
    /// Target resource ID.
    pub target_id: Option<Uuid>,
    /// Target resource type.
    pub target_type: Option<String>,
    /// Human-readable details.
    pub details: Option<String>,
}

impl CreateAuditLogEntry {
    /// Shorthand for an entry targeting a specific resource.
    pub fn targeted(
        user_id: Uuid,
        action: &str,
        target_type: &str,
        target_id: Uuid,
        details: impl Into<Option<String>>,
    ) -> Self {
        Self {
            user_id,
            action: action.to_string(),
            target_id: Some(target_id),
            target_type: Some(target_type.to_string()),
            details: details.into(),
        }
    }
}
