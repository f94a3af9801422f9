use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};

use crate::errors::api::auth::AuthError;
use crate::errors::internal::{CredentialError, InternalError};
use crate::services::TokenService;
use crate::stores::{CredentialStore, UserStore};
use crate::types::dto::auth::{LoginRequest, RegisterRequest, TokenResponse, WhoAmIResponse};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::role::Role;

/// Authentication API endpoints
pub struct AuthApi {
    credential_store: Arc<CredentialStore>,
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
}

impl AuthApi {
    pub fn new(
        credential_store: Arc<CredentialStore>,
        user_store: Arc<UserStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            credential_store,
            user_store,
            token_service,
        }
    }

    fn map_credential_error(err: InternalError) -> AuthError {
        match err {
            InternalError::Credential(CredentialError::UserNotFound(_))
            | InternalError::Credential(CredentialError::PasswordMismatch(_))
            | InternalError::Credential(CredentialError::HashInvalid(_)) => {
                AuthError::invalid_credentials()
            }
            InternalError::Credential(CredentialError::AccountDisabled(_)) => {
                AuthError::account_disabled()
            }
            InternalError::Credential(CredentialError::UsernameTaken(_)) => {
                AuthError::duplicate_username()
            }
            e => {
                tracing::error!("internal error: {e}");
                AuthError::internal_error(e.to_string())
            }
        }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Self-registration for front-desk staff
    ///
    /// Creates a Staff account and logs it in. Other roles are assigned by a
    /// Creator through the user administration endpoints.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, body: Json<RegisterRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let body = body.0;

        let user = self
            .credential_store
            .create_user(body.username, body.password, body.full_name, Role::Staff, false)
            .await
            .map_err(Self::map_credential_error)?;

        let session = self
            .credential_store
            .create_session(&user.id, self.token_service.session_ttl_seconds())
            .await
            .map_err(Self::map_credential_error)?;

        let access_token = self.token_service.generate_jwt(&user, &session.id)?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.session_ttl_seconds(),
        }))
    }

    /// Login with username and password to receive a session token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let user = self
            .credential_store
            .verify_credentials(&body.username, &body.password)
            .await
            .map_err(Self::map_credential_error)?;

        let session = self
            .credential_store
            .create_session(&user.id, self.token_service.session_ttl_seconds())
            .await
            .map_err(Self::map_credential_error)?;

        let access_token = self.token_service.generate_jwt(&user, &session.id)?;

        tracing::info!(username = %user.username, role = %user.role, "login");

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.session_ttl_seconds(),
        }))
    }

    /// Verify the session token and return the authenticated user
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let claims = self.token_service.validate_jwt(&auth.0.token)?;

        let session = self
            .credential_store
            .get_session(&claims.sid)
            .await
            .map_err(Self::map_credential_error)?;
        match session {
            Some(s) if s.expires_at > Utc::now().timestamp() => {}
            _ => return Err(AuthError::expired_token()),
        }

        let user = self
            .user_store
            .get_by_id(&claims.sub)
            .await
            .map_err(|_| AuthError::expired_token())?;

        Ok(Json(WhoAmIResponse {
            user_id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            expires_at: claims.exp,
        }))
    }

    /// Logout and revoke the current session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, auth: BearerAuth) -> Result<Json<MessageResponse>, AuthError> {
        let claims = self.token_service.validate_jwt(&auth.0.token)?;

        self.credential_store
            .delete_session(&claims.sid)
            .await
            .map_err(Self::map_credential_error)?;

        Ok(Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup() -> (DatabaseConnection, AuthApi) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            "test-pepper-for-api-tests".to_string(),
        ));
        let user_store = Arc::new(UserStore::new(db.clone()));
        let token_service = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
        ));

        let api = AuthApi::new(credential_store, user_store, token_service);

        (db, api)
    }

    fn register_request(username: &str) -> Json<RegisterRequest> {
        Json(RegisterRequest {
            username: username.to_string(),
            password: "testpass".to_string(),
            full_name: "Test User".to_string(),
        })
    }

    #[tokio::test]
    async fn test_register_creates_staff_account_and_logs_in() {
        let (_db, api) = setup().await;

        let response = api.register(register_request("frontdesk")).await.unwrap();

        assert!(!response.access_token.is_empty());
        assert_eq!(response.token_type, "Bearer");
        assert!(response.expires_in > 0);

        let auth = BearerAuth(Bearer {
            token: response.access_token.clone(),
        });
        let whoami = api.whoami(auth).await.unwrap();
        assert_eq!(whoami.username, "frontdesk");
        assert_eq!(whoami.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let (_db, api) = setup().await;

        api.register(register_request("frontdesk")).await.unwrap();
        let result = api.register(register_request("frontdesk")).await;

        assert!(matches!(result, Err(AuthError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials() {
        let (_db, api) = setup().await;
        api.register(register_request("frontdesk")).await.unwrap();

        let result = api
            .login(Json(LoginRequest {
                username: "frontdesk".to_string(),
                password: "testpass".to_string(),
            }))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let (_db, api) = setup().await;
        api.register(register_request("frontdesk")).await.unwrap();

        let result = api
            .login(Json(LoginRequest {
                username: "frontdesk".to_string(),
                password: "wrong".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_login_with_unknown_user_fails() {
        let (_db, api) = setup().await;

        let result = api
            .login(Json(LoginRequest {
                username: "nobody".to_string(),
                password: "whatever".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_login() {
        let (db, api) = setup().await;
        api.register(register_request("frontdesk")).await.unwrap();

        let user_store = UserStore::new(db.clone());
        let users = user_store.list().await.unwrap();
        user_store.set_active(&users[0].id, false).await.unwrap();

        let result = api
            .login(Json(LoginRequest {
                username: "frontdesk".to_string(),
                password: "testpass".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AuthError::AccountDisabled(_))));
    }

    #[tokio::test]
    async fn test_logout_revokes_the_session() {
        let (_db, api) = setup().await;
        let response = api.register(register_request("frontdesk")).await.unwrap();

        let auth = BearerAuth(Bearer {
            token: response.access_token.clone(),
        });
        api.logout(auth).await.unwrap();

        // The JWT itself is still within its expiry window, but the session
        // row backing it is gone.
        let auth = BearerAuth(Bearer {
            token: response.access_token.clone(),
        });
        let result = api.whoami(auth).await;
        assert!(matches!(result, Err(AuthError::ExpiredToken(_))));
    }

    #[tokio::test]
    async fn test_whoami_rejects_garbage_token() {
        let (_db, api) = setup().await;

        let auth = BearerAuth(Bearer {
            token: "not-a-jwt".to_string(),
        });
        let result = api.whoami(auth).await;

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
