mod common;

use poem::Request;
use sea_orm::{EntityTrait, PaginatorTrait};

use clinicdesk_backend::errors::api::access::{AccessError, LOGIN_PATH};
use clinicdesk_backend::services::RoleGuard;
use clinicdesk_backend::stores::UserStore;
use clinicdesk_backend::types::db::session;
use clinicdesk_backend::types::internal::role::Role;

use common::{create_role_user, issue_token, setup_test_db, test_credential_store, test_token_service};

const ALL_ROLES: &[Role] = &[
    Role::Creator,
    Role::Admin,
    Role::Admin1,
    Role::Admin2,
    Role::Admin3,
    Role::Doctor,
    Role::Staff,
];

fn request_for(path: &str, token: Option<&str>) -> Request {
    let mut builder = Request::builder().uri(path.parse().expect("valid test uri"));
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.finish()
}

#[tokio::test]
async fn test_guard_proceeds_iff_role_is_allowed() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());

    let allowed: &[Role] = &[Role::Creator, Role::Admin];

    for role in ALL_ROLES {
        let username = format!("user_{}", role);
        let user = create_role_user(&credential_store, &username, *role, false).await;
        let token = issue_token(&credential_store, &token_service, &user).await;

        let result = guard
            .authorize(&request_for("/api/doctors", Some(&token)), allowed)
            .await;

        if allowed.contains(role) {
            let authed = result.unwrap_or_else(|_| panic!("role {} should pass", role));
            assert_eq!(authed.role, *role);
            assert_eq!(authed.username, username);
        } else {
            assert!(result.is_err(), "role {} should be rejected", role);
        }
    }
}

#[tokio::test]
async fn test_guard_allows_superuser_with_any_role() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());

    let user = create_role_user(&credential_store, "super_staff", Role::Staff, true).await;
    let token = issue_token(&credential_store, &token_service, &user).await;

    let result = guard
        .authorize(&request_for("/api/settings", Some(&token)), &[Role::Creator])
        .await;

    assert!(result.is_ok());
    assert!(result.unwrap().is_superuser);
}

#[tokio::test]
async fn test_unauthenticated_request_redirects_to_login_with_next() {
    let db = setup_test_db().await;
    let guard = RoleGuard::new(db.clone(), test_token_service());

    let result = guard
        .authorize(&request_for("/api/patients", None), &[Role::Staff])
        .await;

    match result {
        Err(AccessError::LoginRedirect(location)) => {
            assert_eq!(location, format!("{}?next=/api/patients", LOGIN_PATH));
        }
        other => panic!("expected login redirect, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_token_redirects_to_login() {
    let db = setup_test_db().await;
    let guard = RoleGuard::new(db.clone(), test_token_service());

    let result = guard
        .authorize(
            &request_for("/api/patients", Some("not-a-jwt")),
            &[Role::Staff],
        )
        .await;

    assert!(matches!(result, Err(AccessError::LoginRedirect(_))));
}

#[tokio::test]
async fn test_wrong_role_revokes_session_and_redirects() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());

    let user = create_role_user(&credential_store, "doctor_user", Role::Doctor, false).await;
    let token = issue_token(&credential_store, &token_service, &user).await;

    let result = guard
        .authorize(
            &request_for("/api/users", Some(&token)),
            &[Role::Creator, Role::Admin],
        )
        .await;

    // Forced logout: the redirect carries no next (re-authentication starts
    // over) and the session row backing the token is gone.
    match result {
        Err(AccessError::LoginRedirect(location)) => assert_eq!(location, LOGIN_PATH),
        other => panic!("expected login redirect, got {:?}", other),
    }

    let sessions = session::Entity::find().count(&db).await.unwrap();
    assert_eq!(sessions, 0);

    // The same token is now unauthenticated even for an operation the role
    // would have been allowed to perform.
    let result = guard
        .authorize(
            &request_for("/api/appointments", Some(&token)),
            &[Role::Doctor],
        )
        .await;
    match result {
        Err(AccessError::LoginRedirect(location)) => {
            assert_eq!(location, format!("{}?next=/api/appointments", LOGIN_PATH));
        }
        other => panic!("expected login redirect, got {:?}", other),
    }
}

#[tokio::test]
async fn test_allowed_role_keeps_its_session() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());

    let user = create_role_user(&credential_store, "staff_user", Role::Staff, false).await;
    let token = issue_token(&credential_store, &token_service, &user).await;

    for _ in 0..3 {
        guard
            .authorize(&request_for("/api/patients", Some(&token)), &[Role::Staff])
            .await
            .expect("allowed role should pass repeatedly");
    }

    let sessions = session::Entity::find().count(&db).await.unwrap();
    assert_eq!(sessions, 1);
}

#[tokio::test]
async fn test_deactivated_user_is_unauthenticated() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());
    let user_store = UserStore::new(db.clone());

    let user = create_role_user(&credential_store, "staff_user", Role::Staff, false).await;
    let token = issue_token(&credential_store, &token_service, &user).await;

    user_store.set_active(&user.id, false).await.unwrap();

    let result = guard
        .authorize(&request_for("/api/patients", Some(&token)), &[Role::Staff])
        .await;

    match result {
        Err(AccessError::LoginRedirect(location)) => {
            assert!(location.contains("next="));
        }
        other => panic!("expected login redirect, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expired_session_is_unauthenticated() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());

    let user = create_role_user(&credential_store, "staff_user", Role::Staff, false).await;

    // Session row already expired even though the JWT itself is still valid
    let session = credential_store.create_session(&user.id, -60).await.unwrap();
    let token = token_service.generate_jwt(&user, &session.id).unwrap();

    let result = guard
        .authorize(&request_for("/api/patients", Some(&token)), &[Role::Staff])
        .await;

    assert!(matches!(result, Err(AccessError::LoginRedirect(_))));
}

#[tokio::test]
async fn test_role_change_applies_to_existing_tokens() {
    let db = setup_test_db().await;
    let credential_store = test_credential_store(&db);
    let token_service = test_token_service();
    let guard = RoleGuard::new(db.clone(), token_service.clone());
    let user_store = UserStore::new(db.clone());

    let user = create_role_user(&credential_store, "promoted", Role::Staff, false).await;
    let token = issue_token(&credential_store, &token_service, &user).await;

    // The claims still say staff, but the guard reads the user row.
    user_store.set_role(&user.id, Role::Admin).await.unwrap();

    let result = guard
        .authorize(&request_for("/api/doctors", Some(&token)), &[Role::Admin])
        .await;

    assert_eq!(result.unwrap().role, Role::Admin);
}
