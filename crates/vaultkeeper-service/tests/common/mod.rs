//! Shared test harness: all services wired against one in-memory store.
#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use vaultkeeper_auth::resolver::AccessResolver;
use vaultkeeper_auth::rbac::RoleEnforcer;
use vaultkeeper_core::config::access::AccessConfig;
use vaultkeeper_database::MemoryStore;
use vaultkeeper_database::store::{ApplicationStore, CredentialStore, UserStore};
use vaultkeeper_entity::application::{Application, CreateApplication};
use vaultkeeper_entity::credential::{Category, Credential, Environment, NewCredential};
use vaultkeeper_entity::user::{CreateUser, User, UserRole};
use vaultkeeper_service::{
    ApplicationService, AuditService, CredentialService, GrantService, RequestContext, UserService,
};

/// A fully wired service stack over a single [`MemoryStore`].
pub struct TestVault {
    pub store: MemoryStore,
    pub resolver: Arc<AccessResolver>,
    pub grants: GrantService,
    pub credentials: CredentialService,
    pub applications: ApplicationService,
    pub users: UserService,
    pub audit: AuditService,
}

impl TestVault {
    pub fn new() -> Self {
        Self::with_access(AccessConfig::default())
    }

    pub fn with_access(access: AccessConfig) -> Self {
        let store = MemoryStore::new();
        let store_arc = Arc::new(store.clone());
        let resolver = Arc::new(AccessResolver::new(store_arc.clone()));
        let enforcer = Arc::new(RoleEnforcer::new());

        let grants = GrantService::new(
            store_arc.clone(),
            store_arc.clone(),
            resolver.clone(),
            store_arc.clone(),
        );
        let credentials = CredentialService::new(
            store_arc.clone(),
            store_arc.clone(),
            resolver.clone(),
            enforcer.clone(),
            store_arc.clone(),
            access,
        );
        let applications = ApplicationService::new(
            store_arc.clone(),
            store_arc.clone(),
            store_arc.clone(),
            resolver.clone(),
            enforcer.clone(),
            store_arc.clone(),
        );
        let users = UserService::new(store_arc.clone(), enforcer.clone(), store_arc.clone());
        let audit = AuditService::new(store_arc.clone(), enforcer);

        Self {
            store,
            resolver,
            grants,
            credentials,
            applications,
            users,
            audit,
        }
    }

    /// Insert a user directly into the store.
    pub async fn user(&self, name: &str, role: UserRole) -> User {
        UserStore::create(
            &self.store,
            &CreateUser {
                name: name.to_string(),
                email: format!("{name}@example.com"),
                role,
            },
        )
        .await
        .unwrap()
    }

    /// Build a request context acting as the given user.
    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::for_user(user)
    }

    /// Insert an application directly into the store.
    pub async fn application(&self, created_by: Uuid, name: &str) -> Application {
        ApplicationStore::create(
            &self.store,
            created_by,
            &CreateApplication {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .unwrap()
    }

    /// Insert a credential directly into the store.
    pub async fn credential(
        &self,
        created_by: Uuid,
        title: &str,
        application_id: Option<Uuid>,
        category: Category,
    ) -> Credential {
        CredentialStore::create(
            &self.store,
            created_by,
            &NewCredential {
                title: title.to_string(),
                username: "svc-account".to_string(),
                password: "s3cret".to_string(),
                url: None,
                environment: Environment::Production,
                category,
                application_id,
                notes: None,
            },
        )
        .await
        .unwrap()
    }
}
