// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use clinicdesk_backend::services::TokenService;
use clinicdesk_backend::stores::CredentialStore;
use clinicdesk_backend::types::db::user;
use clinicdesk_backend::types::internal::role::Role;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-integration-tests";

/// Creates a test database with migrations applied.
///
/// The pool is capped at one connection so that every task in a test sees
/// the same in-memory database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(TEST_JWT_SECRET.to_string()))
}

pub fn test_credential_store(db: &DatabaseConnection) -> Arc<CredentialStore> {
    Arc::new(CredentialStore::new(db.clone(), TEST_PEPPER.to_string()))
}

/// Create an active user with the given role.
pub async fn create_role_user(
    credential_store: &CredentialStore,
    username: &str,
    role: Role,
    is_superuser: bool,
) -> user::Model {
    credential_store
        .create_user(
            username.to_string(),
            "testpass".to_string(),
            format!("Test {}", username),
            role,
            is_superuser,
        )
        .await
        .expect("Failed to create test user")
}

/// Log a user in: create a session row and return a bearer token for it.
pub async fn issue_token(
    credential_store: &CredentialStore,
    token_service: &TokenService,
    user: &user::Model,
) -> String {
    let session = credential_store
        .create_session(&user.id, token_service.session_ttl_seconds())
        .await
        .expect("Failed to create session");

    token_service
        .generate_jwt(user, &session.id)
        .expect("Failed to generate token")
}
