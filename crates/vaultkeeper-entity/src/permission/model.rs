//! Application grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use vaultkeeper_core::{AppError, AppResult};

use super::access::ApplicationPermission;
use crate::credential::Category;

/// A per-category refinement of an application grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPermission {
    /// The category being overridden.
    pub category: Category,
    /// The permission for that category.
    pub permission: ApplicationPermission,
}

impl CategoryPermission {
    /// Expand a possibly partial override list to full coverage of
    /// [`Category::ALL`], filling missing categories with `default`.
    ///
    /// Duplicate categories in the input are rejected: a request that names
    /// the same category twice with different values has no well-defined
    /// meaning.
    pub fn fill(
        default: ApplicationPermission,
        overrides: &[CategoryPermission],
    ) -> AppResult<Vec<CategoryPermission>> {
        for (i, a) in overrides.iter().enumerate() {
            if overrides[..i].iter().any(|b| b.category == a.category) {
                return Err(AppError::validation(format!(
                    "Duplicate category in permission list: '{}'",
                    a.category
                )));
            }
        }

        Ok(Category::ALL
            .iter()
            .map(|&category| {
                let permission = overrides
                    .iter()
                    .find(|cp| cp.category == category)
                    .map(|cp| cp.permission)
                    .unwrap_or(default);
                CategoryPermission {
                    category,
                    permission,
                }
            })
            .collect())
    }
}

/// A user's grant on one application: the unique row for a
/// (user, application) pair.
///
/// `permission` is the default level; `category_permissions` refines it per
/// category. The write path always persists full category coverage, but
/// readers never rely on that: [`ApplicationGrant::category_permission`]
/// falls back to the default for any category missing from the list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationGrant {
    /// Unique grant identifier.
    pub id: Uuid,
    /// The grantee.
    pub user_id: Uuid,
    /// The application the grant applies to.
    pub application_id: Uuid,
    /// Default permission level.
    pub permission: ApplicationPermission,
    /// Per-category overrides (stored as JSONB).
    #[sqlx(json)]
    pub category_permissions: Vec<CategoryPermission>,
    /// When the grant was first created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl ApplicationGrant {
    /// The effective permission for one category under this grant.
    pub fn category_permission(&self, category: Category) -> ApplicationPermission {
        self.category_permissions
            .iter()
            .find(|cp| cp.category == category)
            .map(|cp| cp.permission)
            .unwrap_or(self.permission)
    }
}

/// An application grant joined with the grantee's display fields, for the
/// per-application grantee listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GranteeView {
    /// The grant itself.
    #[sqlx(flatten)]
    pub grant: ApplicationGrant,
    /// Grantee display name.
    pub user_name: String,
    /// Grantee email.
    pub user_email: String,
}

/// An application grant joined with the application's display fields, for
/// the per-user grant listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserGrantView {
    /// The grant itself.
    #[sqlx(flatten)]
    pub grant: ApplicationGrant,
    /// Application name.
    pub application_name: String,
    /// Application description.
    pub application_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant_with(
        default: ApplicationPermission,
        overrides: Vec<CategoryPermission>,
    ) -> ApplicationGrant {
        ApplicationGrant {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            permission: default,
            category_permissions: overrides,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fill_completes_missing_categories() {
        let overrides = vec![CategoryPermission {
            category: Category::ProductionHosting,
            permission: ApplicationPermission::Admin,
        }];
        let filled = CategoryPermission::fill(ApplicationPermission::Viewer, &overrides).unwrap();

        assert_eq!(filled.len(), Category::ALL.len());
        for cp in &filled {
            let expected = if cp.category == Category::ProductionHosting {
                ApplicationPermission::Admin
            } else {
                ApplicationPermission::Viewer
            };
            assert_eq!(cp.permission, expected);
        }
    }

    #[test]
    fn test_fill_rejects_duplicates() {
        let overrides = vec![
            CategoryPermission {
                category: Category::Other,
                permission: ApplicationPermission::Admin,
            },
            CategoryPermission {
                category: Category::Other,
                permission: ApplicationPermission::Viewer,
            },
        ];
        assert!(CategoryPermission::fill(ApplicationPermission::Viewer, &overrides).is_err());
    }

    #[test]
    fn test_category_permission_falls_back_to_default() {
        let grant = grant_with(
            ApplicationPermission::Viewer,
            vec![CategoryPermission {
                category: Category::ProductionHosting,
                permission: ApplicationPermission::Admin,
            }],
        );
        assert_eq!(
            grant.category_permission(Category::ProductionHosting),
            ApplicationPermission::Admin
        );
        assert_eq!(
            grant.category_permission(Category::Other),
            ApplicationPermission::Viewer
        );
    }
}
