//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vaultkeeper_core::error::{AppError, ErrorKind};
use vaultkeeper_core::result::AppResult;
use vaultkeeper_core::types::pagination::{PageRequest, PageResponse};
use vaultkeeper_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

use crate::store::AuditLogStore;

/// PostgreSQL repository for the append-only audit log.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for AuditLogRepository {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (user_id, action, target_id, target_type, details) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(entry.target_id)
        .bind(&entry.target_type)
        .bind(&entry.details)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append audit entry", e))
    }

    async fn search(
        &self,
        user_id: Option<Uuid>,
        action: Option<&str>,
        target_type: Option<&str>,
        target_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if user_id.is_some() {
            conditions.push(format!("user_id = ${param_idx}"));
            param_idx += 1;
        }
        if action.is_some() {
            conditions.push(format!("action = ${param_idx}"));
            param_idx += 1;
        }
        if target_type.is_some() {
            conditions.push(format!("target_type = ${param_idx}"));
            param_idx += 1;
        }
        if target_id.is_some() {
            conditions.push(format!("target_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log {where_clause}");
        let select_sql = format!(
            "SELECT * FROM audit_log {where_clause} \
             ORDER BY timestamp DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditLogEntry>(&select_sql);

        if let Some(uid) = user_id {
            count_query = count_query.bind(uid);
            select_query = select_query.bind(uid);
        }
        if let Some(a) = action {
            count_query = count_query.bind(a.to_string());
            select_query = select_query.bind(a.to_string());
        }
        if let Some(tt) = target_type {
            count_query = count_query.bind(tt.to_string());
            select_query = select_query.bind(tt.to_string());
        }
        if let Some(tid) = target_id {
            count_query = count_query.bind(tid);
            select_query = select_query.bind(tid);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
        })?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search audit log", e)
            })?;

        Ok(PageResponse::new(entries, page, total as u64))
    }
}
