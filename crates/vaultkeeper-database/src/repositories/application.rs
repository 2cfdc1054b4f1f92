//! Application repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vaultkeeper_core::error::{AppError, ErrorKind};
use vaultkeeper_core::result::AppResult;
use vaultkeeper_entity::application::{Application, CreateApplication, UpdateApplication};

use crate::store::ApplicationStore;

/// PostgreSQL repository for applications.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Create a new application repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find application", e)
            })
    }

    async fn list(&self) -> AppResult<Vec<Application>> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list applications", e)
            })
    }

    async fn create(&self, created_by: Uuid, data: &CreateApplication) -> AppResult<Application> {
        sqlx::query_as::<_, Application>(
            "INSERT INTO applications (name, description, created_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create application", e))
    }

    async fn update(&self, id: Uuid, data: &UpdateApplication) -> AppResult<Application> {
        sqlx::query_as::<_, Application>(
            "UPDATE applications SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update application", e))?
        .ok_or_else(|| AppError::not_found(format!("Application {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete application", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
