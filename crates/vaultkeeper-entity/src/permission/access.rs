//! Permission level enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission level of an application grant.
///
/// Two levels only: Admin (create/update/delete credentials in the
/// application, manage other users' grants on it) and Viewer (read metadata
/// and, subject to category overrides, reveal secret values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationPermission {
    /// Full control over the application's credentials and grants.
    Admin,
    /// Read-only access.
    Viewer,
}

impl ApplicationPermission {
    /// Check if this permission allows write operations.
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for ApplicationPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationPermission {
    type Err = vaultkeeper_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(vaultkeeper_core::AppError::validation(format!(
                "Invalid application permission: '{s}'"
            ))),
        }
    }
}

/// The resolver's verdict for a (user, application, category) triple.
///
/// `NoAccess` is a distinct sentinel: the absence of a grant is zero
/// access, never an implicit Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Full control.
    Admin,
    /// Read and reveal.
    Viewer,
    /// No access at all.
    NoAccess,
}

impl AccessLevel {
    /// Whether this level permits reading metadata and revealing secrets.
    pub fn can_view(&self) -> bool {
        matches!(self, Self::Admin | Self::Viewer)
    }

    /// Whether this level permits create/update/delete and grant management.
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this level satisfies the given minimum.
    pub fn satisfies(&self, minimum: AccessLevel) -> bool {
        self.rank() >= minimum.rank()
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Admin => 2,
            Self::Viewer => 1,
            Self::NoAccess => 0,
        }
    }
}

impl From<ApplicationPermission> for AccessLevel {
    fn from(permission: ApplicationPermission) -> Self {
        match permission {
            ApplicationPermission::Admin => Self::Admin,
            ApplicationPermission::Viewer => Self::Viewer,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
            Self::NoAccess => write!(f, "no_access"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_access_is_not_viewer() {
        assert!(!AccessLevel::NoAccess.can_view());
        assert!(AccessLevel::Viewer.can_view());
        assert!(!AccessLevel::Viewer.can_write());
        assert!(AccessLevel::Admin.can_write());
    }

    #[test]
    fn test_satisfies() {
        assert!(AccessLevel::Admin.satisfies(AccessLevel::Viewer));
        assert!(!AccessLevel::NoAccess.satisfies(AccessLevel::Viewer));
        assert!(AccessLevel::Viewer.satisfies(AccessLevel::Viewer));
    }
}
