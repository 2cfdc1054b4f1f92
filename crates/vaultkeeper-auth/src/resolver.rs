//! Effective per-application access resolution.
//!
//! Resolution order:
//! 1. Global Admin — always Admin-equivalent at every application. This is
//!    an explicit rule, not a fallthrough.
//! 2. No grant row for (user, application) — NoAccess. A global Manager
//!    with no grant has NoAccess; the Manager role implies nothing
//!    per-application.
//! 3. No category asked — the row's default permission.
//! 4. Category asked — the category override if one exists, else the row's
//!    default.
//!
//! There is no caching: every call re-reads the store, so a revocation is
//! effective on the very next resolve.

use std::sync::Arc;

use uuid::Uuid;

use vaultkeeper_core::AppResult;
use vaultkeeper_core::error::AppError;
use vaultkeeper_database::store::PermissionStore;
use vaultkeeper_entity::credential::Category;
use vaultkeeper_entity::permission::AccessLevel;
use vaultkeeper_entity::user::UserRole;

/// Result of resolving effective access, with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedAccess {
    /// The effective access level.
    pub level: AccessLevel,
    /// Where the level came from.
    pub source: AccessSource,
}

/// Where a resolved access level was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessSource {
    /// The user is a global Admin.
    GlobalAdmin,
    /// The grant row's default permission applied.
    Grant,
    /// A per-category override applied.
    CategoryOverride,
    /// No grant row exists for the pair.
    NoGrant,
}

/// Computes the effective access level for (user, application, category)
/// triples from the permission store.
#[derive(Clone)]
pub struct AccessResolver {
    permissions: Arc<dyn PermissionStore>,
}

impl std::fmt::Debug for AccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessResolver").finish()
    }
}

impl AccessResolver {
    /// Creates a new access resolver.
    pub fn new(permissions: Arc<dyn PermissionStore>) -> Self {
        Self { permissions }
    }

    /// Resolves the effective access level.
    pub async fn resolve(
        &self,
        user_id: Uuid,
        role: &UserRole,
        application_id: Uuid,
        category: Option<Category>,
    ) -> AppResult<AccessLevel> {
        self.resolve_detailed(user_id, role, application_id, category)
            .await
            .map(|resolved| resolved.level)
    }

    /// Resolves the effective access level together with its source.
    pub async fn resolve_detailed(
        &self,
        user_id: Uuid,
        role: &UserRole,
        application_id: Uuid,
        category: Option<Category>,
    ) -> AppResult<ResolvedAccess> {
        if role.is_admin() {
            return Ok(ResolvedAccess {
                level: AccessLevel::Admin,
                source: AccessSource::GlobalAdmin,
            });
        }

        let Some(grant) = self.permissions.find(user_id, application_id).await? else {
            return Ok(ResolvedAccess {
                level: AccessLevel::NoAccess,
                source: AccessSource::NoGrant,
            });
        };

        let resolved = match category {
            Some(category) => {
                let overridden = grant
                    .category_permissions
                    .iter()
                    .find(|cp| cp.category == category);
                match overridden {
                    Some(cp) => ResolvedAccess {
                        level: cp.permission.into(),
                        source: AccessSource::CategoryOverride,
                    },
                    None => ResolvedAccess {
                        level: grant.permission.into(),
                        source: AccessSource::Grant,
                    },
                }
            }
            None => ResolvedAccess {
                level: grant.permission.into(),
                source: AccessSource::Grant,
            },
        };

        Ok(resolved)
    }

    /// Resolves and returns a `Forbidden` error unless the effective level
    /// satisfies `minimum`.
    pub async fn require(
        &self,
        user_id: Uuid,
        role: &UserRole,
        application_id: Uuid,
        category: Option<Category>,
        minimum: AccessLevel,
    ) -> AppResult<AccessLevel> {
        let level = self
            .resolve(user_id, role, application_id, category)
            .await?;
        if level.satisfies(minimum) {
            Ok(level)
        } else {
            Err(AppError::forbidden(
                "You do not have permission to perform this action on this application",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use vaultkeeper_database::MemoryStore;
    use vaultkeeper_database::store::PermissionStore as _;
    use vaultkeeper_entity::permission::{ApplicationPermission, CategoryPermission};

    fn resolver(store: &MemoryStore) -> AccessResolver {
        AccessResolver::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_global_admin_is_admin_everywhere() {
        let store = MemoryStore::new();
        let resolver = resolver(&store);
        let user = Uuid::new_v4();
        let app = Uuid::new_v4();

        for category in Category::ALL.into_iter().map(Some).chain([None]) {
            let resolved = resolver
                .resolve_detailed(user, &UserRole::Admin, app, category)
                .await
                .unwrap();
            assert_eq!(resolved.level, AccessLevel::Admin);
            assert_eq!(resolved.source, AccessSource::GlobalAdmin);
        }
    }

    #[tokio::test]
    async fn test_no_grant_is_no_access_even_for_manager() {
        let store = MemoryStore::new();
        let resolver = resolver(&store);

        for role in [UserRole::Manager, UserRole::Viewer] {
            let resolved = resolver
                .resolve_detailed(Uuid::new_v4(), &role, Uuid::new_v4(), None)
                .await
                .unwrap();
            assert_eq!(resolved.level, AccessLevel::NoAccess);
            assert_eq!(resolved.source, AccessSource::NoGrant);
        }
    }

    #[tokio::test]
    async fn test_category_override_beats_default() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let app = Uuid::new_v4();

        let categories = CategoryPermission::fill(
            ApplicationPermission::Viewer,
            &[CategoryPermission {
                category: Category::ProductionHosting,
                permission: ApplicationPermission::Admin,
            }],
        )
        .unwrap();
        store
            .upsert(user, app, ApplicationPermission::Viewer, &categories)
            .await
            .unwrap();

        let resolver = resolver(&store);
        assert_eq!(
            resolver
                .resolve(
                    user,
                    &UserRole::Viewer,
                    app,
                    Some(Category::ProductionHosting)
                )
                .await
                .unwrap(),
            AccessLevel::Admin
        );
        assert_eq!(
            resolver
                .resolve(user, &UserRole::Viewer, app, Some(Category::Other))
                .await
                .unwrap(),
            AccessLevel::Viewer
        );
        assert_eq!(
            resolver
                .resolve(user, &UserRole::Viewer, app, None)
                .await
                .unwrap(),
            AccessLevel::Viewer
        );
    }

    #[tokio::test]
    async fn test_missing_category_entry_falls_back_to_default() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let app = Uuid::new_v4();

        // A row persisted with no category coverage at all.
        store
            .upsert(user, app, ApplicationPermission::Admin, &[])
            .await
            .unwrap();

        let resolver = resolver(&store);
        let resolved = resolver
            .resolve_detailed(
                user,
                &UserRole::Viewer,
                app,
                Some(Category::StagingApplication),
            )
            .await
            .unwrap();
        assert_eq!(resolved.level, AccessLevel::Admin);
        assert_eq!(resolved.source, AccessSource::Grant);
    }

    #[tokio::test]
    async fn test_require_returns_forbidden() {
        let store = MemoryStore::new();
        let resolver = resolver(&store);

        let err = resolver
            .require(
                Uuid::new_v4(),
                &UserRole::Viewer,
                Uuid::new_v4(),
                None,
                AccessLevel::Viewer,
            )
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }
}
