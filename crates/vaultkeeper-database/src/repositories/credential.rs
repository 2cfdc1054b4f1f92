//! Credential repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vaultkeeper_core::error::{AppError, ErrorKind};
use vaultkeeper_core::result::AppResult;
use vaultkeeper_entity::credential::{Credential, NewCredential, UpdateCredential};

use crate::store::CredentialStore;

/// PostgreSQL repository for credentials.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: PgPool,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for CredentialRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        sqlx::query_as::<_, Credential>("SELECT * FROM credentials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find credential", e)
            })
    }

    async fn list(&self, application_id: Option<Uuid>) -> AppResult<Vec<Credential>> {
        let query = match application_id {
            Some(app_id) => sqlx::query_as::<_, Credential>(
                "SELECT * FROM credentials WHERE application_id = $1 ORDER BY title ASC",
            )
            .bind(app_id),
            None => {
                sqlx::query_as::<_, Credential>("SELECT * FROM credentials ORDER BY title ASC")
            }
        };

        query.fetch_all(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list credentials", e)
        })
    }

    async fn create(&self, created_by: Uuid, data: &NewCredential) -> AppResult<Credential> {
        sqlx::query_as::<_, Credential>(
            "INSERT INTO credentials \
                (title, username, password, url, environment, category, application_id, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.username)
        .bind(&data.password)
        .bind(&data.url)
        .bind(data.environment)
        .bind(data.category)
        .bind(data.application_id)
        .bind(&data.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create credential", e))
    }

    async fn update(&self, id: Uuid, data: &UpdateCredential) -> AppResult<Credential> {
        // Doubly optional fields ($5, $8, $9, $10) bind a change flag plus
        // the new value so an explicit NULL can be distinguished from
        // "leave untouched".
        sqlx::query_as::<_, Credential>(
            "UPDATE credentials SET \
                title = COALESCE($2, title), \
                username = COALESCE($3, username), \
                password = COALESCE($4, password), \
                url = CASE WHEN $5 THEN $6 ELSE url END, \
                environment = COALESCE($7, environment), \
                category = COALESCE($8, category), \
                application_id = CASE WHEN $9 THEN $10 ELSE application_id END, \
                notes = CASE WHEN $11 THEN $12 ELSE notes END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.url.is_some())
        .bind(data.url.clone().flatten())
        .bind(data.environment)
        .bind(data.category)
        .bind(data.application_id.is_some())
        .bind(data.application_id.flatten())
        .bind(data.notes.is_some())
        .bind(data.notes.clone().flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update credential", e))?
        .ok_or_else(|| AppError::not_found(format!("Credential {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM credentials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete credential", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_last_accessed(
        &self,
        id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE credentials SET last_accessed_by = $2, last_accessed_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to stamp last access", e)
        })?;
        Ok(())
    }

    async fn detach_application(&self, application_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE credentials SET application_id = NULL, updated_at = NOW() \
             WHERE application_id = $1",
        )
        .bind(application_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to detach credentials", e)
        })?;
        Ok(result.rows_affected())
    }
}
