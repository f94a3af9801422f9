use chrono::Utc;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt;

use crate::errors::api::auth::AuthError;
use crate::types::db::user;
use crate::types::internal::auth::Claims;

/// Manages session token generation and validation.
///
/// Tokens are HS256 JWTs carrying the backing session row id in `sid`;
/// the role guard checks that row on every request, so deleting it revokes
/// the token before its `exp`.
pub struct TokenService {
    jwt_secret: String,
    session_ttl_hours: i64,
}

impl TokenService {
    /// Create a new TokenService with the given JWT secret
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            session_ttl_hours: 12,
        }
    }

    /// Lifetime of an issued token (and its session row), in seconds
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_hours * 60 * 60
    }

    /// Generate a JWT bound to the given user and session row
    pub fn generate_jwt(&self, user: &user::Model, session_id: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.session_ttl_seconds();

        let claims = Claims {
            sub: user.id.clone(),
            sid: session_id.to_string(),
            role: user.role,
            su: user.is_superuser,
            exp: expiration,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal_error(format!("Failed to generate JWT: {}", e)))?;

        Ok(token)
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::expired_token(),
            _ => AuthError::invalid_token(),
        })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::role::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_user(role: Role) -> user::Model {
        let now = Utc::now().timestamp();
        user::Model {
            id: Uuid::new_v4().to_string(),
            username: "testuser".to_string(),
            password_hash: String::new(),
            full_name: "Test User".to_string(),
            role,
            is_superuser: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_service() -> TokenService {
        TokenService::new("test-secret-key-minimum-32-characters-long".to_string())
    }

    #[test]
    fn test_generate_jwt_round_trips_claims() {
        let service = test_service();
        let user = test_user(Role::Staff);
        let session_id = Uuid::new_v4().to_string();

        let token = service.generate_jwt(&user, &session_id).unwrap();
        let claims = service.validate_jwt(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.sid, session_id);
        assert_eq!(claims.role, Role::Staff);
        assert!(!claims.su);
        assert_eq!(claims.exp - claims.iat, service.session_ttl_seconds());
    }

    #[test]
    fn test_validate_jwt_rejects_garbage() {
        let service = test_service();

        let result = service.validate_jwt("not-a-jwt");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_jwt_rejects_wrong_secret() {
        let service = test_service();
        let other = TokenService::new("another-secret-key-minimum-32-chars-long".to_string());
        let user = test_user(Role::Admin);

        let token = other.generate_jwt(&user, "some-session").unwrap();
        let result = service.validate_jwt(&token);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_jwt_rejects_expired_token() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let service = test_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            sid: Uuid::new_v4().to_string(),
            role: Role::Staff,
            su: false,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret-key-minimum-32-characters-long".as_bytes()),
        )
        .unwrap();

        let result = service.validate_jwt(&token);

        assert!(matches!(result, Err(AuthError::ExpiredToken(_))));
    }
}
