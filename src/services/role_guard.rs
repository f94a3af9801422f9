//! Role-based access guard for clinic endpoints.
//!
//! Every guarded handler declares a static allow-list of roles and calls
//! [`RoleGuard::authorize`] before touching any store. The guard is a pure
//! function of the request and current identity state; it keeps nothing
//! between calls.
//!
//! Failure semantics are deliberately not a 403: an unauthenticated caller
//! is redirected to the login entry point with the originally requested path
//! recorded, and an authenticated caller whose role is not permitted has the
//! presented session revoked (forced logout) before being redirected to
//! login.

use std::sync::Arc;

use chrono::Utc;
use poem::Request;
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::errors::api::access::AccessError;
use crate::errors::internal::InternalError;
use crate::services::token_service::TokenService;
use crate::types::db::{session, user};
use crate::types::internal::auth::AuthedUser;
use crate::types::internal::role::Role;

pub struct RoleGuard {
    db: DatabaseConnection,
    token_service: Arc<TokenService>,
}

impl RoleGuard {
    pub fn new(db: DatabaseConnection, token_service: Arc<TokenService>) -> Self {
        Self { db, token_service }
    }

    /// Check the request's bearer token against an allow-list of roles.
    ///
    /// Returns the authenticated principal when the token maps to a live
    /// session, an active user, and a permitted (or superuser) role.
    pub async fn authorize(
        &self,
        req: &Request,
        allowed: &[Role],
    ) -> Result<AuthedUser, AccessError> {
        let next = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        let token = match Self::bearer_token(req) {
            Some(token) => token,
            None => return Err(AccessError::not_authenticated(next)),
        };

        let claims = match self.token_service.validate_jwt(token) {
            Ok(claims) => claims,
            Err(_) => return Err(AccessError::not_authenticated(next)),
        };

        let now = Utc::now().timestamp();

        let session = session::Entity::find_by_id(claims.sid.as_str())
            .one(&self.db)
            .await
            .map_err(|e| AccessError::from(InternalError::database("load_session", e)))?;
        let session = match session {
            Some(s) if s.expires_at > now => s,
            _ => return Err(AccessError::not_authenticated(next)),
        };

        let user = user::Entity::find_by_id(session.user_id.as_str())
            .one(&self.db)
            .await
            .map_err(|e| AccessError::from(InternalError::database("load_session_user", e)))?;
        // The role is taken from the user row, not from the claims, so a
        // role change applies to already-issued tokens.
        let user = match user {
            Some(u) if u.is_active => u,
            _ => return Err(AccessError::not_authenticated(next)),
        };

        if user.is_superuser || allowed.contains(&user.role) {
            return Ok(AuthedUser {
                user_id: user.id,
                username: user.username,
                full_name: user.full_name,
                role: user.role,
                is_superuser: user.is_superuser,
                session_id: session.id,
            });
        }

        // Authenticated but not permitted: revoke the presented session
        // before redirecting (fail-closed).
        session::Entity::delete_by_id(session.id.as_str())
            .exec(&self.db)
            .await
            .map_err(|e| AccessError::from(InternalError::database("revoke_session", e)))?;

        tracing::warn!(
            username = %user.username,
            role = %user.role,
            path = %next,
            "role not permitted; session revoked"
        );

        Err(AccessError::role_not_permitted())
    }

    fn bearer_token<'a>(req: &'a Request) -> Option<&'a str> {
        req.header("Authorization")?
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for RoleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleGuard").field("db", &"<connection>").finish()
    }
}
