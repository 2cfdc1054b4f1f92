//! Grant management — create, replace, revoke, and list application grants.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use vaultkeeper_auth::resolver::AccessResolver;
use vaultkeeper_core::AppResult;
use vaultkeeper_core::error::AppError;
use vaultkeeper_database::store::{AuditLogStore, PermissionStore, UserStore};
use vaultkeeper_entity::audit::{CreateAuditLogEntry, actions};
use vaultkeeper_entity::permission::{
    AccessLevel, ApplicationGrant, ApplicationPermission, CategoryPermission, GranteeView,
    UserGrantView,
};

use crate::audit::record_best_effort;
use crate::context::RequestContext;

/// Request to create or replace a user's grant on an application.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GrantRequest {
    /// The grantee.
    pub user_id: Uuid,
    /// The application to grant access to.
    pub application_id: Uuid,
    /// Default permission level.
    pub permission: ApplicationPermission,
    /// Per-category overrides. May be empty or partial; missing categories
    /// are filled with the default before the row is persisted.
    pub category_permissions: Vec<CategoryPermission>,
}

/// Manages application grants.
///
/// Every mutation requires the granter to resolve as Admin on the target
/// application (a global Admin always does). The grant row is replaced as a
/// single atomic upsert, never patched field-by-field, so a concurrent
/// resolve can only ever observe a complete old or complete new row.
#[derive(Clone)]
pub struct GrantService {
    permissions: Arc<dyn PermissionStore>,
    users: Arc<dyn UserStore>,
    resolver: Arc<AccessResolver>,
    audit: Arc<dyn AuditLogStore>,
}

impl std::fmt::Debug for GrantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrantService").finish()
    }
}

impl GrantService {
    /// Creates a new grant service.
    pub fn new(
        permissions: Arc<dyn PermissionStore>,
        users: Arc<dyn UserStore>,
        resolver: Arc<AccessResolver>,
        audit: Arc<dyn AuditLogStore>,
    ) -> Self {
        Self {
            permissions,
            users,
            resolver,
            audit,
        }
    }

    /// Creates or replaces a grant.
    ///
    /// Re-granting for the same (user, application) pair replaces the whole
    /// row: the default permission and all six category entries. Setting a
    /// new default with no overrides therefore resets every category to the
    /// new default — a full overwrite, not a merge.
    pub async fn grant(
        &self,
        ctx: &RequestContext,
        request: GrantRequest,
    ) -> AppResult<ApplicationGrant> {
        self.require_granter(ctx, request.application_id).await?;

        let grantee = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Cannot grant to unknown user {}", request.user_id))
            })?;

        let categories =
            CategoryPermission::fill(request.permission, &request.category_permissions)?;

        let grant = self
            .permissions
            .upsert(
                request.user_id,
                request.application_id,
                request.permission,
                &categories,
            )
            .await?;

        info!(
            granter = %ctx.user_id,
            grantee = %grantee.id,
            application = %request.application_id,
            permission = %request.permission,
            "Application permission granted"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::PERMISSION_GRANT,
                "grant",
                grant.id,
                Some(format!(
                    "Granted {} on application {} to {}",
                    request.permission, request.application_id, grantee.email
                )),
            ),
        )
        .await;

        Ok(grant)
    }

    /// Revokes a grant. Idempotent: revoking a non-existent grant is a
    /// no-op success.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        application_id: Uuid,
    ) -> AppResult<()> {
        self.require_granter(ctx, application_id).await?;

        let removed = self.permissions.delete(user_id, application_id).await?;

        if removed {
            info!(
                granter = %ctx.user_id,
                grantee = %user_id,
                application = %application_id,
                "Application permission revoked"
            );

            record_best_effort(
                self.audit.as_ref(),
                CreateAuditLogEntry::targeted(
                    ctx.user_id,
                    actions::PERMISSION_REVOKE,
                    "application",
                    application_id,
                    Some(format!("Revoked access of user {user_id}")),
                ),
            )
            .await;
        }

        Ok(())
    }

    /// Lists all grants on an application, joined with grantee display
    /// fields. Requires Admin on the application.
    pub async fn list_grantees(
        &self,
        ctx: &RequestContext,
        application_id: Uuid,
    ) -> AppResult<Vec<GranteeView>> {
        self.require_granter(ctx, application_id).await?;
        self.permissions.find_for_application(application_id).await
    }

    /// Lists the applications a user has been granted access to.
    ///
    /// Users may list their own grants; a global Admin may list anyone's.
    pub async fn list_user_grants(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> AppResult<Vec<UserGrantView>> {
        if ctx.user_id != user_id && !ctx.is_admin() {
            return Err(AppError::forbidden(
                "Only a global Admin may list another user's grants",
            ));
        }
        self.permissions.find_for_user(user_id).await
    }

    /// Granter check shared by every operation: Admin on the application's
    /// default permission, or global Admin.
    async fn require_granter(&self, ctx: &RequestContext, application_id: Uuid) -> AppResult<()> {
        self.resolver
            .require(
                ctx.user_id,
                &ctx.role,
                application_id,
                None,
                AccessLevel::Admin,
            )
            .await?;
        Ok(())
    }
}
