//! Store contract traits.
//!
//! These traits are the logical collaborator contract between the
//! authorization core and its backing store. Services and the resolver
//! depend only on `Arc<dyn …Store>`; the concrete implementations live in
//! [`crate::repositories`] (PostgreSQL) and [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use vaultkeeper_core::AppResult;
use vaultkeeper_core::types::pagination::{PageRequest, PageResponse};
use vaultkeeper_entity::application::{Application, CreateApplication, UpdateApplication};
use vaultkeeper_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use vaultkeeper_entity::credential::{Credential, NewCredential, UpdateCredential};
use vaultkeeper_entity::permission::{
    ApplicationGrant, ApplicationPermission, CategoryPermission, GranteeView, UserGrantView,
};
use vaultkeeper_entity::user::{CreateUser, User, UserRole};

/// Store contract for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users with pagination.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Create a user. Fails with `Conflict` on a duplicate email.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Replace a user's global role. Fails with `NotFound` if missing.
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User>;

    /// Stamp a user's last login time.
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a user. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Store contract for applications.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Find an application by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>>;

    /// List all applications.
    async fn list(&self) -> AppResult<Vec<Application>>;

    /// Create an application.
    async fn create(&self, created_by: Uuid, data: &CreateApplication) -> AppResult<Application>;

    /// Apply a field-wise update. Fails with `NotFound` if missing.
    async fn update(&self, id: Uuid, data: &UpdateApplication) -> AppResult<Application>;

    /// Delete an application. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Store contract for credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a credential by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>>;

    /// List credentials, optionally restricted to one application.
    async fn list(&self, application_id: Option<Uuid>) -> AppResult<Vec<Credential>>;

    /// Create a credential.
    async fn create(&self, created_by: Uuid, data: &NewCredential) -> AppResult<Credential>;

    /// Apply a field-wise update. Fails with `NotFound` if missing.
    async fn update(&self, id: Uuid, data: &UpdateCredential) -> AppResult<Credential>;

    /// Delete a credential. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Record a secret reveal on the credential row.
    async fn touch_last_accessed(
        &self,
        id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Unlink every credential of an application (they become standalone).
    /// Returns the number of rows touched.
    async fn detach_application(&self, application_id: Uuid) -> AppResult<u64>;
}

/// Store contract for application grants.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Find the grant row for a (user, application) pair.
    async fn find(&self, user_id: Uuid, application_id: Uuid)
    -> AppResult<Option<ApplicationGrant>>;

    /// All grants on an application, joined with grantee display fields.
    async fn find_for_application(&self, application_id: Uuid) -> AppResult<Vec<GranteeView>>;

    /// All grants held by a user, joined with application display fields.
    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserGrantView>>;

    /// Create or replace the grant row for a (user, application) pair.
    ///
    /// Must be a single atomic operation on the composite key — never a
    /// read-modify-write split — so concurrent grants end in exactly one of
    /// the submitted states.
    async fn upsert(
        &self,
        user_id: Uuid,
        application_id: Uuid,
        permission: ApplicationPermission,
        category_permissions: &[CategoryPermission],
    ) -> AppResult<ApplicationGrant>;

    /// Delete the grant row for a (user, application) pair. Idempotent;
    /// returns `true` if a row existed.
    async fn delete(&self, user_id: Uuid, application_id: Uuid) -> AppResult<bool>;

    /// Delete every grant row on an application. Returns the number removed.
    async fn delete_for_application(&self, application_id: Uuid) -> AppResult<u64>;
}

/// Store contract for the append-only audit log.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Append an entry. There is no update or delete counterpart.
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Search entries by actor/action/target, newest first.
    async fn search(
        &self,
        user_id: Option<Uuid>,
        action: Option<&str>,
        target_type: Option<&str>,
        target_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>>;
}
