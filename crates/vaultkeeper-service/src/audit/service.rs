//! Audit log querying and the shared best-effort recording helper.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use vaultkeeper_auth::rbac::{RoleEnforcer, SystemAction};
use vaultkeeper_core::AppResult;
use vaultkeeper_core::types::pagination::{PageRequest, PageResponse};
use vaultkeeper_database::store::AuditLogStore;
use vaultkeeper_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

use crate::context::RequestContext;

/// Append an audit entry, logging (but swallowing) any failure.
///
/// Audit is best-effort observability for most operations; only the
/// reveal-secret path treats an append failure as fatal, and that path
/// calls the store directly instead of going through here.
pub async fn record_best_effort(store: &dyn AuditLogStore, entry: CreateAuditLogEntry) {
    if let Err(e) = store.append(&entry).await {
        warn!(action = %entry.action, error = %e, "Failed to record audit entry");
    }
}

/// Filters for searching the audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditSearch {
    /// Restrict to one actor.
    pub user_id: Option<Uuid>,
    /// Restrict to one action code.
    pub action: Option<String>,
    /// Restrict to one target type.
    pub target_type: Option<String>,
    /// Restrict to one target.
    pub target_id: Option<Uuid>,
}

/// Admin-gated audit log queries.
#[derive(Clone)]
pub struct AuditService {
    audit: Arc<dyn AuditLogStore>,
    enforcer: Arc<RoleEnforcer>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish()
    }
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit: Arc<dyn AuditLogStore>, enforcer: Arc<RoleEnforcer>) -> Self {
        Self { audit, enforcer }
    }

    /// Searches the audit log, newest entries first.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: &AuditSearch,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        self.enforcer.require(&ctx.role, &SystemAction::ViewAuditLog)?;

        self.audit
            .search(
                filter.user_id,
                filter.action.as_deref(),
                filter.target_type.as_deref(),
                filter.target_id,
                page,
            )
            .await
    }
}
