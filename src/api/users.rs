use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::errors::api::access::AccessError;
use crate::errors::internal::{CredentialError, InternalError};
use crate::services::RoleGuard;
use crate::stores::{CredentialStore, DoctorStore, UserStore};
use crate::types::db::user;
use crate::types::dto::users::{CreateUserRequest, SetRoleRequest, UserResponse};
use crate::types::internal::auth::AuthedUser;
use crate::types::internal::role::Role;

const ADMIN_ROLES: &[Role] = &[Role::Creator];

/// User administration API endpoints
pub struct UsersApi {
    guard: Arc<RoleGuard>,
    user_store: Arc<UserStore>,
    credential_store: Arc<CredentialStore>,
    doctor_store: Arc<DoctorStore>,
}

impl UsersApi {
    pub fn new(
        guard: Arc<RoleGuard>,
        user_store: Arc<UserStore>,
        credential_store: Arc<CredentialStore>,
        doctor_store: Arc<DoctorStore>,
    ) -> Self {
        Self {
            guard,
            user_store,
            credential_store,
            doctor_store,
        }
    }

    /// Creator accounts and accounts older than the acting user are off
    /// limits for role and activation changes.
    async fn check_guard_rails(
        &self,
        actor: &AuthedUser,
        target: &user::Model,
    ) -> Result<(), AccessError> {
        if target.role == Role::Creator {
            return Err(AccessError::forbidden(
                "Creator accounts cannot be modified",
            ));
        }

        let actor_row = self.user_store.get_by_id(&actor.user_id).await?;
        if target.created_at < actor_row.created_at {
            return Err(AccessError::forbidden(
                "Accounts older than yours cannot be modified",
            ));
        }

        Ok(())
    }

    /// An Admin2 account doubles as a priceable doctor profile; make sure
    /// one exists with a freshly assigned code prefix.
    async fn provision_admin2(&self, target: &user::Model) -> Result<(), AccessError> {
        if target.role == Role::Admin2 {
            self.doctor_store.ensure_profile_for(target).await?;
        }
        Ok(())
    }
}

/// API tags for user administration endpoints
#[derive(Tags)]
enum UserTags {
    /// User administration
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// List user accounts
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list(&self, req: &Request) -> Result<Json<Vec<UserResponse>>, AccessError> {
        self.guard.authorize(req, ADMIN_ROLES).await?;

        let users = self.user_store.list().await?;

        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    /// Create a user account with an explicit role
    #[oai(path = "/", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, AccessError> {
        self.guard.authorize(req, ADMIN_ROLES).await?;

        let body = body.0;
        let user = self
            .credential_store
            .create_user(body.username, body.password, body.full_name, body.role, false)
            .await
            .map_err(|e| match e {
                InternalError::Credential(CredentialError::UsernameTaken(name)) => {
                    AccessError::bad_request(format!("Username already taken: {}", name))
                }
                e => e.into(),
            })?;

        self.provision_admin2(&user).await?;

        Ok(Json(UserResponse::from(user)))
    }

    /// Change a user's role
    #[oai(path = "/:id/role", method = "post", tag = "UserTags::Users")]
    async fn set_role(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<SetRoleRequest>,
    ) -> Result<Json<UserResponse>, AccessError> {
        let actor = self.guard.authorize(req, ADMIN_ROLES).await?;

        let target = self.user_store.get_by_id(&id.0).await?;
        self.check_guard_rails(&actor, &target).await?;

        let updated = self.user_store.set_role(&target.id, body.role).await?;
        self.provision_admin2(&updated).await?;

        // The guard reads the role from the user row, so live sessions would
        // continue under the new role; revoke them instead.
        self.credential_store
            .delete_sessions_for_user(&updated.id)
            .await?;

        tracing::info!(
            username = %updated.username,
            role = %updated.role,
            by = %actor.username,
            "role changed"
        );

        Ok(Json(UserResponse::from(updated)))
    }

    /// Enable or disable login for an account
    #[oai(path = "/:id/toggle-active", method = "post", tag = "UserTags::Users")]
    async fn toggle_active(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<UserResponse>, AccessError> {
        let actor = self.guard.authorize(req, ADMIN_ROLES).await?;

        let target = self.user_store.get_by_id(&id.0).await?;
        self.check_guard_rails(&actor, &target).await?;

        let updated = self
            .user_store
            .set_active(&target.id, !target.is_active)
            .await?;

        if !updated.is_active {
            self.credential_store
                .delete_sessions_for_user(&updated.id)
                .await?;
        }

        tracing::info!(
            username = %updated.username,
            is_active = updated.is_active,
            by = %actor.username,
            "account toggled"
        );

        Ok(Json(UserResponse::from(updated)))
    }
}
