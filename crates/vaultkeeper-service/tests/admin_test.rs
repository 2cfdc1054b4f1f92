//! Integration tests for user administration, application lifecycle, and
//! audit log access.

mod common;

use common::TestVault;

use vaultkeeper_core::error::ErrorKind;
use vaultkeeper_core::types::pagination::PageRequest;
use vaultkeeper_entity::application::{CreateApplication, UpdateApplication};
use vaultkeeper_entity::credential::Category;
use vaultkeeper_entity::permission::{AccessLevel, ApplicationPermission};
use vaultkeeper_entity::user::{CreateUser, UserRole};
use vaultkeeper_service::GrantRequest;
use vaultkeeper_service::audit::AuditSearch;

#[tokio::test]
async fn test_only_admin_manages_users() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let manager = vault.user("mel", UserRole::Manager).await;

    let data = CreateUser {
        name: "New Person".to_string(),
        email: "new@example.com".to_string(),
        role: UserRole::Viewer,
    };

    let err = vault
        .users
        .create(&vault.ctx(&manager), data.clone())
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let created = vault.users.create(&vault.ctx(&admin), data).await.unwrap();
    assert_eq!(created.role, UserRole::Viewer);

    // Duplicate email is a conflict.
    let err = vault
        .users
        .create(
            &vault.ctx(&admin),
            CreateUser {
                name: "Other".to_string(),
                email: "NEW@example.com".to_string(),
                role: UserRole::Viewer,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_admin_cannot_demote_or_delete_self() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let ctx = vault.ctx(&admin);

    let err = vault
        .users
        .update_role(&ctx, admin.id, UserRole::Viewer)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let err = vault.users.delete(&ctx, admin.id).await.unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn test_role_change_and_login_stamp() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let viewer = vault.user("vee", UserRole::Viewer).await;
    let ctx = vault.ctx(&admin);

    let updated = vault
        .users
        .update_role(&ctx, viewer.id, UserRole::Manager)
        .await
        .unwrap();
    assert_eq!(updated.role, UserRole::Manager);

    assert!(viewer.last_login.is_none());
    vault.users.record_login(viewer.id).await.unwrap();
    let fetched = vault.users.get(&ctx, viewer.id).await.unwrap();
    assert!(fetched.last_login.is_some());
}

#[tokio::test]
async fn test_application_creation_is_manager_capability() {
    let vault = TestVault::new();
    let manager = vault.user("mel", UserRole::Manager).await;
    let viewer = vault.user("vee", UserRole::Viewer).await;

    let data = CreateApplication {
        name: "billing".to_string(),
        description: Some("Billing stack".to_string()),
    };

    let err = vault
        .applications
        .create(&vault.ctx(&viewer), data.clone())
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let app = vault
        .applications
        .create(&vault.ctx(&manager), data)
        .await
        .unwrap();

    // Creation grants the creator nothing: the manager still has NoAccess.
    assert_eq!(
        vault
            .resolver
            .resolve(manager.id, &manager.role, app.id, None)
            .await
            .unwrap(),
        AccessLevel::NoAccess
    );

    // Mutation rights flow from grants, not creator identity.
    let err = vault
        .applications
        .update(
            &vault.ctx(&manager),
            app.id,
            UpdateApplication {
                name: Some("billing-v2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn test_application_delete_revokes_grants_and_detaches_credentials() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let viewer = vault.user("vee", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;
    let credential = vault
        .credential(admin.id, "billing db", Some(app.id), Category::Other)
        .await;
    let ctx = vault.ctx(&admin);

    vault
        .grants
        .grant(
            &ctx,
            GrantRequest {
                user_id: viewer.id,
                application_id: app.id,
                permission: ApplicationPermission::Admin,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();

    vault.applications.delete(&ctx, app.id).await.unwrap();

    assert!(
        vault
            .applications
            .get(&ctx, app.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert_eq!(
        vault
            .resolver
            .resolve(viewer.id, &viewer.role, app.id, None)
            .await
            .unwrap(),
        AccessLevel::NoAccess
    );

    // The credential lives on, detached.
    let listed = vault.credentials.list(&ctx, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, credential.id);
    assert_eq!(listed[0].application_id, None);
}

#[tokio::test]
async fn test_audit_search_is_admin_gated() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let manager = vault.user("mel", UserRole::Manager).await;

    // Generate some trail.
    vault
        .applications
        .create(
            &vault.ctx(&manager),
            CreateApplication {
                name: "billing".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let err = vault
        .audit
        .search(
            &vault.ctx(&manager),
            &AuditSearch::default(),
            &PageRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let entries = vault
        .audit
        .search(
            &vault.ctx(&admin),
            &AuditSearch {
                user_id: Some(manager.id),
                ..Default::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(entries.total_items, 1);
    assert_eq!(entries.items[0].action, "APPLICATION_CREATE");
}
