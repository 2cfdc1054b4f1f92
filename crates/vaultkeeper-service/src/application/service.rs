//! Application management — create, update, and delete credential groupings.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use vaultkeeper_auth::rbac::{RoleEnforcer, SystemAction};
use vaultkeeper_auth::resolver::AccessResolver;
use vaultkeeper_core::AppResult;
use vaultkeeper_core::error::AppError;
use vaultkeeper_database::store::{
    ApplicationStore, AuditLogStore, CredentialStore, PermissionStore,
};
use vaultkeeper_entity::application::{Application, CreateApplication, UpdateApplication};
use vaultkeeper_entity::audit::{CreateAuditLogEntry, actions};
use vaultkeeper_entity::permission::AccessLevel;

use crate::audit::record_best_effort;
use crate::context::RequestContext;

/// Manages applications (logical groupings of credentials).
///
/// Creation is a global-role capability (Manager and above); mutation and
/// deletion require per-application Admin through the resolver. Creating an
/// application grants the creator nothing: per-application rights come only
/// from explicit grants.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationStore>,
    credentials: Arc<dyn CredentialStore>,
    permissions: Arc<dyn PermissionStore>,
    resolver: Arc<AccessResolver>,
    enforcer: Arc<RoleEnforcer>,
    audit: Arc<dyn AuditLogStore>,
}

impl std::fmt::Debug for ApplicationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationService").finish()
    }
}

impl ApplicationService {
    /// Creates a new application service.
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        credentials: Arc<dyn CredentialStore>,
        permissions: Arc<dyn PermissionStore>,
        resolver: Arc<AccessResolver>,
        enforcer: Arc<RoleEnforcer>,
        audit: Arc<dyn AuditLogStore>,
    ) -> Self {
        Self {
            applications,
            credentials,
            permissions,
            resolver,
            enforcer,
            audit,
        }
    }

    /// Creates an application.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        data: CreateApplication,
    ) -> AppResult<Application> {
        self.enforcer
            .require(&ctx.role, &SystemAction::CreateApplication)?;

        let application = self.applications.create(ctx.user_id, &data).await?;

        info!(
            user = %ctx.user_id,
            application = %application.id,
            name = %application.name,
            "Application created"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::APPLICATION_CREATE,
                "application",
                application.id,
                Some(format!("Created application '{}'", application.name)),
            ),
        )
        .await;

        Ok(application)
    }

    /// Fetches one application. Application names are not secret; any
    /// authenticated user may look them up. Credential content stays
    /// resolver-gated.
    pub async fn get(&self, _ctx: &RequestContext, id: Uuid) -> AppResult<Application> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Application {id} not found")))
    }

    /// Lists all applications.
    pub async fn list(&self, _ctx: &RequestContext) -> AppResult<Vec<Application>> {
        self.applications.list().await
    }

    /// Updates an application. Requires Admin on it.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        data: UpdateApplication,
    ) -> AppResult<Application> {
        self.resolver
            .require(ctx.user_id, &ctx.role, id, None, AccessLevel::Admin)
            .await?;

        let application = self.applications.update(id, &data).await?;

        info!(user = %ctx.user_id, application = %id, "Application updated");

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::APPLICATION_UPDATE,
                "application",
                id,
                Some(format!("Updated application '{}'", application.name)),
            ),
        )
        .await;

        Ok(application)
    }

    /// Deletes an application. Requires Admin on it.
    ///
    /// Grant rows on the application are removed; its credentials are
    /// detached and live on as standalone credentials.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let application = self.get(ctx, id).await?;
        self.resolver
            .require(ctx.user_id, &ctx.role, id, None, AccessLevel::Admin)
            .await?;

        let detached = self.credentials.detach_application(id).await?;
        let revoked = self.permissions.delete_for_application(id).await?;
        self.applications.delete(id).await?;

        info!(
            user = %ctx.user_id,
            application = %id,
            detached_credentials = detached,
            revoked_grants = revoked,
            "Application deleted"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::APPLICATION_DELETE,
                "application",
                id,
                Some(format!("Deleted application '{}'", application.name)),
            ),
        )
        .await;

        Ok(())
    }
}
