use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::internal::{CredentialError, InternalError};
use crate::types::db::session;
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::role::Role;

/// CredentialStore manages user credentials and login sessions in the database
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn hasher(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Create a new user account.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The created user
    /// * `Err(InternalError)` - `CredentialError::UsernameTaken` or a database error
    pub async fn create_user(
        &self,
        username: String,
        password: String,
        full_name: String,
        role: Role,
        is_superuser: bool,
    ) -> Result<user::Model, InternalError> {
        let existing = User::find()
            .filter(user::Column::Username.eq(&username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))?;

        if existing.is_some() {
            return Err(CredentialError::UsernameTaken(username).into());
        }

        let salt = SaltString::generate(&mut rand_core::OsRng);
        let password_hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?
            .to_string();

        let now = Utc::now().timestamp();
        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.clone()),
            password_hash: Set(password_hash),
            full_name: Set(full_name),
            role: Set(role),
            is_superuser: Set(is_superuser),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            // Unique index backstop for racing registrations
            if e.to_string().contains("UNIQUE") {
                InternalError::from(CredentialError::UsernameTaken(username.clone()))
            } else {
                InternalError::database("insert_user", e)
            }
        })?;

        Ok(model)
    }

    /// Verify user credentials and return the user on success.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - Credentials valid and account active
    /// * `Err(InternalError)` - `CredentialError::UserNotFound`, `PasswordMismatch`,
    ///   `AccountDisabled`, or a database error
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))?
            .ok_or_else(|| CredentialError::UserNotFound(username.to_string()))?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| CredentialError::HashInvalid(username.to_string()))?;

        self.hasher()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| CredentialError::PasswordMismatch(username.to_string()))?;

        if !user.is_active {
            return Err(CredentialError::AccountDisabled(username.to_string()).into());
        }

        Ok(user)
    }

    /// Create a login session for the user, expiring `ttl_seconds` from now.
    pub async fn create_session(
        &self,
        user_id: &str,
        ttl_seconds: i64,
    ) -> Result<session::Model, InternalError> {
        let now = Utc::now().timestamp();
        let new_session = session::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            expires_at: Set(now + ttl_seconds),
            created_at: Set(now),
        };

        new_session
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_session", e))
    }

    /// Look up a session by id.
    pub async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<session::Model>, InternalError> {
        session::Entity::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_session", e))
    }

    /// Delete one session (logout). Deleting an unknown session is not an error.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), InternalError> {
        session::Entity::delete_by_id(session_id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;

        Ok(())
    }

    /// Delete every session the user holds (forced logout on role change or
    /// deactivation). Returns the number of revoked sessions.
    pub async fn delete_sessions_for_user(&self, user_id: &str) -> Result<u64, InternalError> {
        let res = session::Entity::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_sessions_for_user", e))?;

        Ok(res.rows_affected)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
