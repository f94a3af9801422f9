use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::errors::internal::{CredentialError, InternalError};
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::role::Role;

/// UserStore handles account administration: listing, role changes, activation
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_id(&self, user_id: &str) -> Result<user::Model, InternalError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_user_by_id", e))?
            .ok_or_else(|| CredentialError::UserNotFound(user_id.to_string()).into())
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn count(&self) -> Result<u64, InternalError> {
        User::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    /// Change a user's role. The caller enforces who may do this.
    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<user::Model, InternalError> {
        let user = self.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_user_role", e))
    }

    /// Enable or disable login for an account.
    pub async fn set_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        let user = self.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))
    }
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore").field("db", &"<connection>").finish()
    }
}
