//! Credential entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::Category;
use super::environment::Environment;

/// A stored credential (username/password pair with context).
///
/// The password is opaque to this core: it is stored and transported as
/// received, never serialized outward, and only ever read back through the
/// reveal operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    /// Unique credential identifier.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Login username.
    pub username: String,
    /// Secret value.
    #[serde(skip_serializing)]
    pub password: String,
    /// Optional login URL.
    pub url: Option<String>,
    /// Deployment environment.
    pub environment: Environment,
    /// Organizational category.
    pub category: Category,
    /// Linked application (None = standalone credential).
    pub application_id: Option<Uuid>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The user who created this credential.
    pub created_by: Uuid,
    /// When the credential was created.
    pub created_at: DateTime<Utc>,
    /// When the credential was last updated.
    pub updated_at: DateTime<Utc>,
    /// Who last revealed the secret value.
    pub last_accessed_by: Option<Uuid>,
    /// When the secret value was last revealed.
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether this credential is linked to an application.
    pub fn is_standalone(&self) -> bool {
        self.application_id.is_none()
    }

    /// Project this credential into its password-free metadata view.
    pub fn metadata(&self) -> CredentialMetadata {
        CredentialMetadata {
            id: self.id,
            title: self.title.clone(),
            username: self.username.clone(),
            url: self.url.clone(),
            environment: self.environment,
            category: self.category,
            application_id: self.application_id,
            notes: self.notes.clone(),
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_accessed_by: self.last_accessed_by,
            last_accessed_at: self.last_accessed_at,
        }
    }
}

/// Everything about a credential except its secret value.
///
/// This is the only shape listing operations return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialMetadata {
    /// Unique credential identifier.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// Login username.
    pub username: String,
    /// Optional login URL.
    pub url: Option<String>,
    /// Deployment environment.
    pub environment: Environment,
    /// Organizational category.
    pub category: Category,
    /// Linked application (None = standalone).
    pub application_id: Option<Uuid>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The user who created this credential.
    pub created_by: Uuid,
    /// When the credential was created.
    pub created_at: DateTime<Utc>,
    /// When the credential was last updated.
    pub updated_at: DateTime<Utc>,
    /// Who last revealed the secret value.
    pub last_accessed_by: Option<Uuid>,
    /// When the secret value was last revealed.
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// Data required to create a new credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCredential {
    /// Human-readable title.
    pub title: String,
    /// Login username.
    pub username: String,
    /// Secret value.
    pub password: String,
    /// Optional login URL.
    pub url: Option<String>,
    /// Deployment environment.
    pub environment: Environment,
    /// Organizational category.
    pub category: Category,
    /// Linked application (None = standalone).
    pub application_id: Option<Uuid>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Field-wise update of an existing credential.
///
/// `None` leaves a field untouched. `application_id` is doubly optional so
/// a credential can be explicitly detached (`Some(None)`) as well as moved
/// (`Some(Some(id))`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCredential {
    /// New title.
    pub title: Option<String>,
    /// New username.
    pub username: Option<String>,
    /// New secret value.
    pub password: Option<String>,
    /// New URL.
    pub url: Option<Option<String>>,
    /// New environment.
    pub environment: Option<Environment>,
    /// New category.
    pub category: Option<Category>,
    /// New application link (Some(None) detaches).
    pub application_id: Option<Option<Uuid>>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

impl UpdateCredential {
    /// The category the credential will have after applying this update.
    pub fn target_category(&self, current: Category) -> Category {
        self.category.unwrap_or(current)
    }

    /// The application link the credential will have after applying this
    /// update.
    pub fn target_application(&self, current: Option<Uuid>) -> Option<Uuid> {
        self.application_id.unwrap_or(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_targets() {
        let update = UpdateCredential {
            category: Some(Category::Other),
            application_id: Some(None),
            ..Default::default()
        };
        assert_eq!(
            update.target_category(Category::StagingHosting),
            Category::Other
        );
        assert_eq!(update.target_application(Some(Uuid::new_v4())), None);

        let noop = UpdateCredential::default();
        assert_eq!(
            noop.target_category(Category::StagingHosting),
            Category::StagingHosting
        );
    }
}
