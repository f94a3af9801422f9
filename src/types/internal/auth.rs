use serde::{Deserialize, Serialize};

use crate::types::internal::role::Role;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Session id backing this token; deleting the session row revokes the token
    pub sid: String,

    /// Role at issuance time (informational; the guard re-reads the user row)
    pub role: Role,

    /// Superuser flag at issuance time
    pub su: bool,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// The authenticated principal attached to a guarded request.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: String,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub session_id: String,
}
