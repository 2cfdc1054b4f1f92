//! Integration tests for grant management and permission resolution.

mod common;

use common::TestVault;

use vaultkeeper_core::error::ErrorKind;
use vaultkeeper_entity::credential::Category;
use vaultkeeper_entity::permission::{AccessLevel, ApplicationPermission, CategoryPermission};
use vaultkeeper_entity::user::UserRole;
use vaultkeeper_service::GrantRequest;

fn full_viewer_with(
    category: Category,
    permission: ApplicationPermission,
) -> Vec<CategoryPermission> {
    CategoryPermission::fill(
        ApplicationPermission::Viewer,
        &[CategoryPermission {
            category,
            permission,
        }],
    )
    .unwrap()
}

#[tokio::test]
async fn test_grant_round_trips_per_category() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;

    let categories = full_viewer_with(Category::ProductionHosting, ApplicationPermission::Admin);
    vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: categories.clone(),
            },
        )
        .await
        .unwrap();

    for cp in &categories {
        let level = vault
            .resolver
            .resolve(grantee.id, &grantee.role, app.id, Some(cp.category))
            .await
            .unwrap();
        assert_eq!(level, AccessLevel::from(cp.permission), "{}", cp.category);
    }
}

#[tokio::test]
async fn test_partial_overrides_fill_with_default() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;

    // Only one category named; the other five must default to Admin.
    vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Admin,
                category_permissions: vec![CategoryPermission {
                    category: Category::Other,
                    permission: ApplicationPermission::Viewer,
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(
        vault
            .resolver
            .resolve(grantee.id, &grantee.role, app.id, Some(Category::Other))
            .await
            .unwrap(),
        AccessLevel::Viewer
    );
    assert_eq!(
        vault
            .resolver
            .resolve(
                grantee.id,
                &grantee.role,
                app.id,
                Some(Category::StagingHosting)
            )
            .await
            .unwrap(),
        AccessLevel::Admin
    );
}

#[tokio::test]
async fn test_regrant_overwrites_all_category_overrides() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;
    let ctx = vault.ctx(&admin);

    vault
        .grants
        .grant(
            &ctx,
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: full_viewer_with(
                    Category::ProductionHosting,
                    ApplicationPermission::Admin,
                ),
            },
        )
        .await
        .unwrap();

    // Changing the default with no overrides cascades: no stale
    // per-category values survive.
    vault
        .grants
        .grant(
            &ctx,
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Admin,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();

    for category in Category::ALL {
        assert_eq!(
            vault
                .resolver
                .resolve(grantee.id, &grantee.role, app.id, Some(category))
                .await
                .unwrap(),
            AccessLevel::Admin,
            "{category}"
        );
    }
}

#[tokio::test]
async fn test_revoke_returns_to_no_access_and_is_idempotent() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;
    let ctx = vault.ctx(&admin);

    vault
        .grants
        .grant(
            &ctx,
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();

    vault.grants.revoke(&ctx, grantee.id, app.id).await.unwrap();
    assert_eq!(
        vault
            .resolver
            .resolve(grantee.id, &grantee.role, app.id, None)
            .await
            .unwrap(),
        AccessLevel::NoAccess
    );

    // Revoking again is a no-op success.
    vault.grants.revoke(&ctx, grantee.id, app.id).await.unwrap();
}

#[tokio::test]
async fn test_granter_must_resolve_as_admin() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let manager = vault.user("mel", UserRole::Manager).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;

    // A global Manager with no grant on the application cannot grant.
    let err = vault
        .grants
        .grant(
            &vault.ctx(&manager),
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    // Once granted per-application Admin, the same manager can grant.
    vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: manager.id,
                application_id: app.id,
                permission: ApplicationPermission::Admin,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();

    vault
        .grants
        .grant(
            &vault.ctx(&manager),
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_grant_to_unknown_user_is_validation_error() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let app = vault.application(admin.id, "billing").await;

    let err = vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: uuid::Uuid::new_v4(),
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_duplicate_categories_are_rejected() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;

    let duplicate = CategoryPermission {
        category: Category::Other,
        permission: ApplicationPermission::Viewer,
    };
    let err = vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: grantee.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: vec![duplicate, duplicate],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_concurrent_grants_end_in_one_submitted_state() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let grantee = vault.user("bea", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;
    let ctx = vault.ctx(&admin);

    let viewer_grant = vault.grants.grant(
        &ctx,
        GrantRequest {
            user_id: grantee.id,
            application_id: app.id,
            permission: ApplicationPermission::Viewer,
            category_permissions: Vec::new(),
        },
    );
    let admin_grant = vault.grants.grant(
        &ctx,
        GrantRequest {
            user_id: grantee.id,
            application_id: app.id,
            permission: ApplicationPermission::Admin,
            category_permissions: Vec::new(),
        },
    );

    let (a, b) = tokio::join!(viewer_grant, admin_grant);
    a.unwrap();
    b.unwrap();

    // The final row is exactly one of the two inputs: its default and every
    // category entry agree.
    let default = vault
        .resolver
        .resolve(grantee.id, &grantee.role, app.id, None)
        .await
        .unwrap();
    assert!(matches!(default, AccessLevel::Admin | AccessLevel::Viewer));
    for category in Category::ALL {
        assert_eq!(
            vault
                .resolver
                .resolve(grantee.id, &grantee.role, app.id, Some(category))
                .await
                .unwrap(),
            default,
            "mixed row after concurrent grants at {category}"
        );
    }
}

#[tokio::test]
async fn test_list_grantees_requires_admin_on_application() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let viewer = vault.user("vee", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;

    vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: viewer.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();

    let err = vault
        .grants
        .list_grantees(&vault.ctx(&viewer), app.id)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let grantees = vault
        .grants
        .list_grantees(&vault.ctx(&admin), app.id)
        .await
        .unwrap();
    assert_eq!(grantees.len(), 1);
    assert_eq!(grantees[0].user_email, viewer.email);
}

#[tokio::test]
async fn test_users_may_list_only_their_own_grants() {
    let vault = TestVault::new();
    let admin = vault.user("root", UserRole::Admin).await;
    let viewer = vault.user("vee", UserRole::Viewer).await;
    let other = vault.user("omar", UserRole::Viewer).await;
    let app = vault.application(admin.id, "billing").await;

    vault
        .grants
        .grant(
            &vault.ctx(&admin),
            GrantRequest {
                user_id: viewer.id,
                application_id: app.id,
                permission: ApplicationPermission::Viewer,
                category_permissions: Vec::new(),
            },
        )
        .await
        .unwrap();

    let own = vault
        .grants
        .list_user_grants(&vault.ctx(&viewer), viewer.id)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].application_name, app.name);

    let err = vault
        .grants
        .list_user_grants(&vault.ctx(&other), viewer.id)
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    // A global Admin may list anyone's.
    assert_eq!(
        vault
            .grants
            .list_user_grants(&vault.ctx(&admin), viewer.id)
            .await
            .unwrap()
            .len(),
        1
    );
}
