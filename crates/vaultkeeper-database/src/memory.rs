//! In-memory store implementation using a Tokio mutex.
//!
//! Implements every store contract against plain maps. Suitable for
//! single-node evaluation and for tests; semantics (unique email, composite
//! grant key, idempotent deletes, append-only audit) match the PostgreSQL
//! repositories.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use vaultkeeper_core::AppResult;
use vaultkeeper_core::error::AppError;
use vaultkeeper_core::types::pagination::{PageRequest, PageResponse};
use vaultkeeper_entity::application::{Application, CreateApplication, UpdateApplication};
use vaultkeeper_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use vaultkeeper_entity::credential::{Credential, NewCredential, UpdateCredential};
use vaultkeeper_entity::permission::{
    ApplicationGrant, ApplicationPermission, CategoryPermission, GranteeView, UserGrantView,
};
use vaultkeeper_entity::user::{CreateUser, User, UserRole};

use crate::store::{ApplicationStore, AuditLogStore, CredentialStore, PermissionStore, UserStore};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    applications: HashMap<Uuid, Application>,
    credentials: HashMap<Uuid, Credential>,
    // Grant rows keyed by the composite (user, application) key, so a
    // repeated grant replaces in place exactly like the unique constraint.
    grants: HashMap<(Uuid, Uuid), ApplicationGrant>,
    audit: Vec<AuditLogEntry>,
}

/// In-memory implementation of all store contracts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of audit entries recorded so far.
    pub async fn audit_len(&self) -> usize {
        self.state.lock().await.audit.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = users.len() as u64;
        let items = users
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict(format!(
                "A user with email '{}' already exists",
                data.email
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            role: data.role,
            created_at: Utc::now(),
            last_login: None,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&id) {
            user.last_login = Some(at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.lock().await.users.remove(&id).is_some())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Application>> {
        Ok(self.state.lock().await.applications.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Application>> {
        let state = self.state.lock().await;
        let mut apps: Vec<Application> = state.applications.values().cloned().collect();
        apps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apps)
    }

    async fn create(&self, created_by: Uuid, data: &CreateApplication) -> AppResult<Application> {
        let now = Utc::now();
        let app = Application {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            description: data.description.clone(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .applications
            .insert(app.id, app.clone());
        Ok(app)
    }

    async fn update(&self, id: Uuid, data: &UpdateApplication) -> AppResult<Application> {
        let mut state = self.state.lock().await;
        let app = state
            .applications
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Application {id} not found")))?;
        if let Some(name) = &data.name {
            app.name = name.clone();
        }
        if let Some(description) = &data.description {
            app.description = Some(description.clone());
        }
        app.updated_at = Utc::now();
        Ok(app.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.lock().await.applications.remove(&id).is_some())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        Ok(self.state.lock().await.credentials.get(&id).cloned())
    }

    async fn list(&self, application_id: Option<Uuid>) -> AppResult<Vec<Credential>> {
        let state = self.state.lock().await;
        let mut credentials: Vec<Credential> = state
            .credentials
            .values()
            .filter(|c| application_id.is_none() || c.application_id == application_id)
            .cloned()
            .collect();
        credentials.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(credentials)
    }

    async fn create(&self, created_by: Uuid, data: &NewCredential) -> AppResult<Credential> {
        let now = Utc::now();
        let credential = Credential {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            username: data.username.clone(),
            password: data.password.clone(),
            url: data.url.clone(),
            environment: data.environment,
            category: data.category,
            application_id: data.application_id,
            notes: data.notes.clone(),
            created_by,
            created_at: now,
            updated_at: now,
            last_accessed_by: None,
            last_accessed_at: None,
        };
        self.state
            .lock()
            .await
            .credentials
            .insert(credential.id, credential.clone());
        Ok(credential)
    }

    async fn update(&self, id: Uuid, data: &UpdateCredential) -> AppResult<Credential> {
        let mut state = self.state.lock().await;
        let credential = state
            .credentials
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Credential {id} not found")))?;
        if let Some(title) = &data.title {
            credential.title = title.clone();
        }
        if let Some(username) = &data.username {
            credential.username = username.clone();
        }
        if let Some(password) = &data.password {
            credential.password = password.clone();
        }
        if let Some(url) = &data.url {
            credential.url = url.clone();
        }
        if let Some(environment) = data.environment {
            credential.environment = environment;
        }
        if let Some(category) = data.category {
            credential.category = category;
        }
        if let Some(application_id) = data.application_id {
            credential.application_id = application_id;
        }
        if let Some(notes) = &data.notes {
            credential.notes = notes.clone();
        }
        credential.updated_at = Utc::now();
        Ok(credential.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.lock().await.credentials.remove(&id).is_some())
    }

    async fn touch_last_accessed(
        &self,
        id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(credential) = state.credentials.get_mut(&id) {
            credential.last_accessed_by = Some(user_id);
            credential.last_accessed_at = Some(at);
        }
        Ok(())
    }

    async fn detach_application(&self, application_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut touched = 0;
        for credential in state.credentials.values_mut() {
            if credential.application_id == Some(application_id) {
                credential.application_id = None;
                credential.updated_at = Utc::now();
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find(
        &self,
        user_id: Uuid,
        application_id: Uuid,
    ) -> AppResult<Option<ApplicationGrant>> {
        Ok(self
            .state
            .lock()
            .await
            .grants
            .get(&(user_id, application_id))
            .cloned())
    }

    async fn find_for_application(&self, application_id: Uuid) -> AppResult<Vec<GranteeView>> {
        let state = self.state.lock().await;
        let mut views: Vec<GranteeView> = state
            .grants
            .values()
            .filter(|g| g.application_id == application_id)
            .filter_map(|g| {
                state.users.get(&g.user_id).map(|u| GranteeView {
                    grant: g.clone(),
                    user_name: u.name.clone(),
                    user_email: u.email.clone(),
                })
            })
            .collect();
        views.sort_by(|a, b| a.user_name.cmp(&b.user_name));
        Ok(views)
    }

    async fn find_for_user(&self, user_id: Uuid) -> AppResult<Vec<UserGrantView>> {
        let state = self.state.lock().await;
        let mut views: Vec<UserGrantView> = state
            .grants
            .values()
            .filter(|g| g.user_id == user_id)
            .filter_map(|g| {
                state.applications.get(&g.application_id).map(|a| UserGrantView {
                    grant: g.clone(),
                    application_name: a.name.clone(),
                    application_description: a.description.clone(),
                })
            })
            .collect();
        views.sort_by(|a, b| a.application_name.cmp(&b.application_name));
        Ok(views)
    }

    async fn upsert(
        &self,
        user_id: Uuid,
        application_id: Uuid,
        permission: ApplicationPermission,
        category_permissions: &[CategoryPermission],
    ) -> AppResult<ApplicationGrant> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        // The whole row is replaced under one lock acquisition, mirroring
        // the single-statement database upsert.
        let grant = match state.grants.get(&(user_id, application_id)) {
            Some(existing) => ApplicationGrant {
                id: existing.id,
                user_id,
                application_id,
                permission,
                category_permissions: category_permissions.to_vec(),
                created_at: existing.created_at,
                updated_at: now,
            },
            None => ApplicationGrant {
                id: Uuid::new_v4(),
                user_id,
                application_id,
                permission,
                category_permissions: category_permissions.to_vec(),
                created_at: now,
                updated_at: now,
            },
        };
        state
            .grants
            .insert((user_id, application_id), grant.clone());
        Ok(grant)
    }

    async fn delete(&self, user_id: Uuid, application_id: Uuid) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .grants
            .remove(&(user_id, application_id))
            .is_some())
    }

    async fn delete_for_application(&self, application_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.grants.len();
        state.grants.retain(|_, g| g.application_id != application_id);
        Ok((before - state.grants.len()) as u64)
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let record = AuditLogEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            action: entry.action.clone(),
            target_id: entry.target_id,
            target_type: entry.target_type.clone(),
            details: entry.details.clone(),
            timestamp: Utc::now(),
        };
        self.state.lock().await.audit.push(record.clone());
        Ok(record)
    }

    async fn search(
        &self,
        user_id: Option<Uuid>,
        action: Option<&str>,
        target_type: Option<&str>,
        target_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<AuditLogEntry> = state
            .audit
            .iter()
            .filter(|e| user_id.is_none_or(|uid| e.user_id == uid))
            .filter(|e| action.is_none_or(|a| e.action == a))
            .filter(|e| target_type.is_none_or(|tt| e.target_type.as_deref() == Some(tt)))
            .filter(|e| target_id.is_none_or(|tid| e.target_id == Some(tid)))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let total = entries.len() as u64;
        let items = entries
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }
}
