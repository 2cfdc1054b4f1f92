//! Application grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use vaultkeeper_core::error::{AppError, ErrorKind};
use vaultkeeper_core::result::AppResult;
use vaultkeeper_entity::permission::{
    ApplicationGrant, ApplicationPermission, CategoryPermission, GranteeView, UserGrantView,
};

use crate::store::PermissionStore;

/// PostgreSQL repository for application grants.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn find(
        &self,
        user_id: Uuid,
        application_id: Uuid,
    ) -> AppResult<Option<ApplicationGrant>> {
        sqlx::query_as::<_, ApplicationGrant>(
            "SELECT * FROM user_application_permissions \
             WHERE user_id = $1 AND application_id = $2",
        )
        .bind(user_id)
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grant", e))
    }

    async fn find_for_application(&self, application_id: Uuid) -> AppResult<Vec<GranteeView>> {
        sqlx::query_as::<_, GranteeView>(
            "SELECT p.*, u.name AS user_name, u.email AS user_email \
             FROM user_application_permissions p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.application_id = $1 \
             ORDER BY u.name ASC",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list application grants", e)
        })
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserGrantView>> {
        sqlx::query_as::<_, UserGrantView>(
            "SELECT p.*, a.name AS application_name, a.description AS application_description \
             FROM user_application_permissions p \
             JOIN applications a ON a.id = p.application_id \
             WHERE p.user_id = $1 \
             ORDER BY a.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list user grants", e))
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        application_id: Uuid,
        permission: ApplicationPermission,
        category_permissions: &[CategoryPermission],
    ) -> AppResult<ApplicationGrant> {
        // Single statement keyed on the composite unique constraint: two
        // concurrent grants for the same pair serialize in the database and
        // the row always holds exactly one submitted state.
        sqlx::query_as::<_, ApplicationGrant>(
            "INSERT INTO user_application_permissions \
                (user_id, application_id, permission, category_permissions) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, application_id) DO UPDATE SET \
                permission = EXCLUDED.permission, \
                category_permissions = EXCLUDED.category_permissions, \
                updated_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(application_id)
        .bind(permission)
        .bind(Json(category_permissions))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert grant", e))
    }

    async fn delete(&self, user_id: Uuid, application_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM user_application_permissions \
             WHERE user_id = $1 AND application_id = $2",
        )
        .bind(user_id)
        .bind(application_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete grant", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_application(&self, application_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM user_application_permissions WHERE application_id = $1")
                .bind(application_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to delete application grants",
                        e,
                    )
                })?;
        Ok(result.rows_affected())
    }
}
