use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::internal::role::Role;

/// Request model for administrative user creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Username for the new account
    pub username: String,

    /// Password for the new account
    pub password: String,

    /// Display name
    pub full_name: String,

    /// Role assigned to the new account
    pub role: Role,
}

/// Request model for changing a user's role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetRoleRequest {
    /// New role
    pub role: Role,
}

/// User account record
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID (UUID)
    pub id: String,

    /// Username
    pub username: String,

    /// Display name
    pub full_name: String,

    /// Role
    pub role: Role,

    /// Whether role checks are bypassed for this account
    pub is_superuser: bool,

    /// Whether the account may authenticate
    pub is_active: bool,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            full_name: u.full_name,
            role: u.role,
            is_superuser: u.is_superuser,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}
