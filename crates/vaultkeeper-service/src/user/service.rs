//! User administration — Admin-gated account management.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use vaultkeeper_auth::rbac::{RoleEnforcer, SystemAction};
use vaultkeeper_core::AppResult;
use vaultkeeper_core::error::AppError;
use vaultkeeper_core::types::pagination::{PageRequest, PageResponse};
use vaultkeeper_database::store::{AuditLogStore, UserStore};
use vaultkeeper_entity::audit::{CreateAuditLogEntry, actions};
use vaultkeeper_entity::user::{CreateUser, User, UserRole};

use crate::audit::record_best_effort;
use crate::context::RequestContext;

/// Admin-gated user account administration.
///
/// Deleting a user removes login capability only; audit entries and
/// historical grant references keep the id.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    enforcer: Arc<RoleEnforcer>,
    audit: Arc<dyn AuditLogStore>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        enforcer: Arc<RoleEnforcer>,
        audit: Arc<dyn AuditLogStore>,
    ) -> Self {
        Self {
            users,
            enforcer,
            audit,
        }
    }

    /// Creates a user account. Fails with `Conflict` on a duplicate email.
    pub async fn create(&self, ctx: &RequestContext, data: CreateUser) -> AppResult<User> {
        self.enforcer.require(&ctx.role, &SystemAction::ManageUsers)?;

        let user = self.users.create(&data).await?;

        info!(
            admin = %ctx.user_id,
            user = %user.id,
            role = %user.role,
            "User created"
        );

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::USER_CREATE,
                "user",
                user.id,
                Some(format!("Created user '{}' with role {}", user.email, user.role)),
            ),
        )
        .await;

        Ok(user)
    }

    /// Fetches one user.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<User> {
        self.enforcer.require(&ctx.role, &SystemAction::ReadUsers)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Lists users with pagination.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.enforcer.require(&ctx.role, &SystemAction::ReadUsers)?;
        self.users.list(page).await
    }

    /// Changes a user's global role.
    ///
    /// An admin cannot demote themselves; lowering your own role mid-session
    /// is how a vault ends up with no administrator.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        self.enforcer.require(&ctx.role, &SystemAction::ManageUsers)?;

        if id == ctx.user_id && !role.is_admin() {
            return Err(AppError::forbidden(
                "Administrators cannot demote their own account",
            ));
        }

        let user = self.users.update_role(id, role).await?;

        info!(admin = %ctx.user_id, user = %id, role = %role, "User role changed");

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(
                ctx.user_id,
                actions::USER_ROLE_CHANGE,
                "user",
                id,
                Some(format!("Changed role of '{}' to {}", user.email, role)),
            ),
        )
        .await;

        Ok(user)
    }

    /// Deletes a user account.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        self.enforcer.require(&ctx.role, &SystemAction::ManageUsers)?;

        if id == ctx.user_id {
            return Err(AppError::forbidden(
                "Administrators cannot delete their own account",
            ));
        }

        let removed = self.users.delete(id).await?;
        if !removed {
            return Err(AppError::not_found(format!("User {id} not found")));
        }

        info!(admin = %ctx.user_id, user = %id, "User deleted");

        record_best_effort(
            self.audit.as_ref(),
            CreateAuditLogEntry::targeted(ctx.user_id, actions::USER_DELETE, "user", id, None),
        )
        .await;

        Ok(())
    }

    /// Stamps a user's last login time. Called by the external
    /// authentication layer after a successful sign-in; takes no context
    /// because the actor *is* the user logging in.
    pub async fn record_login(&self, user_id: Uuid) -> AppResult<()> {
        self.users.touch_last_login(user_id, Utc::now()).await
    }
}
