//! Credential access gate — every credential-affecting operation consults
//! the resolver before touching the store, and writes an audit trail.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use vaultkeeper_auth::rbac::{RoleEnforcer, SystemAction};
use vaultkeeper_auth::resolver::AccessResolver;
use vaultkeeper_core::AppResult;
use vaultkeeper_core::config::access::{AccessConfig, StandaloneVisibility};
use vaultkeeper_core::error::AppError;
use vaultkeeper_database::store::{ApplicationStore, AuditLogStore, CredentialStore};
use vaultkeeper_entity::audit::{CreateAuditLogEntry, actions};
use vaultkeeper_entity::credential::{
    Category, Credential, CredentialMetadata, NewCredential, UpdateCredential,
};
use vaultkeeper_entity::permission::AccessLevel;

use crate::audit::record_best_effort;
use crate::context::RequestContext;

/// Gates every credential operation behind the access resolver.
///
/// Single-item operations fail with `Forbidden` when access is missing;
/// listings silently exclude what the caller cannot see.
#[derive(Clone)]
pub struct CredentialService {
    credentials: Arc<dyn CredentialStore>,
    applications: Arc<dyn ApplicationStore>,
    resolver: Arc<AccessResolver>,
    enforcer: Arc<RoleEnforcer>,
    audit: Arc<dyn AuditLogStore>,
    access: AccessConfig,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService").finish()
    }
}

impl CredentialService {
    /// Creates a new credential service.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        applications: Arc<dyn ApplicationStore>,
        resolver: Arc<AccessResolver>,
        enforcer: Arc<RoleEnforcer>,
        audit: Arc<dyn AuditLogStore>,
        access: AccessConfig,
    ) -> Self {
        Self {
            credentials,
            applications,
            resolver,
            enforcer,
            audit,
            access,
        }
    }

    /// Lists credential metadata, optionally restricted to one application.
    ///
    /// Credentials the caller cannot view are excluded rather than failing
    /// the whole call. The password never appears in the result.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        application_id: Option<Uuid>,
    ) -> AppResult<Vec<CredentialMetadata>> {
        let credentials = self.credentials.list(application_id).await?;

        let mut visible = Vec::with_capacity(credentials.len());
        for credential in &credentials {
            if self.can_view(ctx, credential).await? {
                visible.push(credential.metadata());
            }
        }
        Ok(visible)
    }

    /// Reveals a credential's secret value.
    ///
    /// Log-then-serve: the `CREDENTIAL_VIEW` audit entry is appended before
    /// the secret leaves this function, and a failed append aborts the
    /// reveal. No secret is ever served without a trace.
    pub async fn reveal(&self, ctx: &RequestContext, credential_id: Uuid) -> AppResult<String> {
        let credential = self.find_existing(credential_id).await?;

        if !self.can_view(ctx, &credential).await? {
            return Err(AppError::forbidden(
                "You do not have permission to view this credential",
            ));
        }

        self.audit
            .append(&CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::CREDENTIAL_VIEW,
                "credential",
                credential.id,
                Some(format!("Revealed credential '{}'", credential.title)),
            ))
            .await?;

        if let Err(e) = self
            .credentials
            .touch_last_accessed(credential.id, ctx.user_id, Utc::now())
            .await
        {
            warn!(credential = %credential.id, error = %e, "Failed to stamp last access");
        }

        info!(
            user = %ctx.user_id,
            credential = %credential.id,
            "Credential revealed"
        );

        Ok(credential.password)
    }

    /// Creates a credential.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        data: NewCredential,
    ) -> AppResult<CredentialMetadata> {
        if let Some(application_id) = data.application_id {
            self.require_application_exists(application_id).await?;
        }
        self.require_write(ctx, data.application_id, data.category)
            .await?;

        let credential = self.credentials.create(ctx.user_id, &data).await?;

        info!(
            user = %ctx.user_id,
            credential = %credential.id,
            application = ?credential.application_id,
            "Credential created"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::CREDENTIAL_CREATE,
                "credential",
                credential.id,
                Some(format!("Created credential '{}'", credential.title)),
            ),
        )
        .await;

        Ok(credential.metadata())
    }

    /// Updates a credential.
    ///
    /// The permission check runs against the credential's *current*
    /// application and category first, so an update cannot be used to move
    /// a credential into a location the caller does not administer and then
    /// edit it there. If the update changes the location, the same Admin
    /// rule must also hold at the destination.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        credential_id: Uuid,
        data: UpdateCredential,
    ) -> AppResult<CredentialMetadata> {
        let credential = self.find_existing(credential_id).await?;

        self.require_write(ctx, credential.application_id, credential.category)
            .await?;

        let target_application = data.target_application(credential.application_id);
        let target_category = data.target_category(credential.category);
        let moved = target_application != credential.application_id
            || target_category != credential.category;
        if moved {
            if let Some(application_id) = target_application {
                if target_application != credential.application_id {
                    self.require_application_exists(application_id).await?;
                }
            }
            self.require_write(ctx, target_application, target_category)
                .await?;
        }

        let updated = self.credentials.update(credential_id, &data).await?;

        info!(
            user = %ctx.user_id,
            credential = %updated.id,
            moved = moved,
            "Credential updated"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::CREDENTIAL_UPDATE,
                "credential",
                updated.id,
                Some(format!("Updated credential '{}'", updated.title)),
            ),
        )
        .await;

        Ok(updated.metadata())
    }

    /// Deletes a credential. Same permission rule as update, evaluated
    /// against the credential's current location.
    pub async fn delete(&self, ctx: &RequestContext, credential_id: Uuid) -> AppResult<()> {
        let credential = self.find_existing(credential_id).await?;

        self.require_write(ctx, credential.application_id, credential.category)
            .await?;

        self.credentials.delete(credential_id).await?;

        info!(
            user = %ctx.user_id,
            credential = %credential_id,
            "Credential deleted"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::CREDENTIAL_DELETE,
                "credential",
                credential_id,
                Some(format!("Deleted credential '{}'", credential.title)),
            ),
        )
        .await;

        Ok(())
    }

    async fn find_existing(&self, credential_id: Uuid) -> AppResult<Credential> {
        self.credentials
            .find_by_id(credential_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Credential {credential_id} not found")))
    }

    async fn require_application_exists(&self, application_id: Uuid) -> AppResult<()> {
        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Application {application_id} not found")))
            .map(|_| ())
    }

    /// Visibility check for metadata reads and reveals.
    async fn can_view(&self, ctx: &RequestContext, credential: &Credential) -> AppResult<bool> {
        match credential.application_id {
            Some(application_id) => {
                let level = self
                    .resolver
                    .resolve(
                        ctx.user_id,
                        &ctx.role,
                        application_id,
                        Some(credential.category),
                    )
                    .await?;
                Ok(level.can_view())
            }
            None => Ok(self.standalone_visible(ctx, credential)),
        }
    }

    /// Standalone credentials have no grant rows; visibility follows the
    /// configured policy.
    fn standalone_visible(&self, ctx: &RequestContext, credential: &Credential) -> bool {
        if ctx.is_admin() || credential.created_by == ctx.user_id {
            return true;
        }
        match self.access.standalone_visibility {
            StandaloneVisibility::PrivilegedAndCreator => ctx.is_manager_or_above(),
            StandaloneVisibility::CreatorOnly => false,
        }
    }

    /// Write check for create/update/delete at a given location.
    async fn require_write(
        &self,
        ctx: &RequestContext,
        application_id: Option<Uuid>,
        category: Category,
    ) -> AppResult<()> {
        match application_id {
            Some(application_id) => {
                self.resolver
                    .require(
                        ctx.user_id,
                        &ctx.role,
                        application_id,
                        Some(category),
                        AccessLevel::Admin,
                    )
                    .await?;
                Ok(())
            }
            None => self
                .enforcer
                .require(&ctx.role, &SystemAction::CreateStandaloneCredential),
        }
    }
}
