use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::internal::InternalError;
use crate::services::numbering;
use crate::types::db::doctor::{self, Entity as Doctor};
use crate::types::db::user;

pub struct NewDoctor {
    pub full_name: String,
    pub department: String,
    pub phone: String,
    pub room_number: String,
    /// Assigned from the unused-prefix pool when None
    pub code_prefix: Option<String>,
    pub created_by: Option<String>,
}

pub struct DoctorUpdate {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub room_number: Option<String>,
    pub code_prefix: Option<String>,
}

/// DoctorStore manages doctor records and their receipt code prefixes
pub struct DoctorStore {
    db: DatabaseConnection,
}

impl DoctorStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, doctor_id: &str) -> Result<Option<doctor::Model>, InternalError> {
        Doctor::find_by_id(doctor_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_doctor", e))
    }

    /// List doctors ordered by name, optionally filtered by a free-text query
    /// over name, department, phone, and room number.
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<doctor::Model>, InternalError> {
        let mut find = Doctor::find();

        if let Some(q) = query.filter(|q| !q.is_empty()) {
            find = find.filter(
                Condition::any()
                    .add(doctor::Column::FullName.contains(q))
                    .add(doctor::Column::Department.contains(q))
                    .add(doctor::Column::Phone.contains(q))
                    .add(doctor::Column::RoomNumber.contains(q)),
            );
        }

        find.order_by_asc(doctor::Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_doctors", e))
    }

    /// Code prefixes currently assigned to doctors.
    pub async fn used_prefixes(&self) -> Result<HashSet<String>, InternalError> {
        let doctors = Doctor::find()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_doctor_prefixes", e))?;

        Ok(doctors.into_iter().map(|d| d.code_prefix).collect())
    }

    pub async fn create(&self, new: NewDoctor) -> Result<doctor::Model, InternalError> {
        let code_prefix = match new.code_prefix {
            Some(prefix) => prefix,
            None => numbering::next_code_prefix(&self.used_prefixes().await?),
        };

        let model = doctor::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            full_name: Set(new.full_name),
            department: Set(new.department),
            phone: Set(new.phone),
            room_number: Set(new.room_number),
            code_prefix: Set(code_prefix),
            receipt_serial: Set(0),
            created_by: Set(new.created_by),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_doctor", e))
    }

    pub async fn update(
        &self,
        doctor_id: &str,
        update: DoctorUpdate,
    ) -> Result<Option<doctor::Model>, InternalError> {
        let Some(doc) = self.get(doctor_id).await? else {
            return Ok(None);
        };

        let mut active: doctor::ActiveModel = doc.into();
        if let Some(full_name) = update.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(department) = update.department {
            active.department = Set(department);
        }
        if let Some(phone) = update.phone {
            active.phone = Set(phone);
        }
        if let Some(room_number) = update.room_number {
            active.room_number = Set(room_number);
        }
        if let Some(code_prefix) = update.code_prefix {
            active.code_prefix = Set(code_prefix.trim().to_uppercase().chars().take(2).collect());
        }

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_doctor", e))?;

        Ok(Some(model))
    }

    /// Delete a doctor. Returns false when the id is unknown.
    pub async fn delete(&self, doctor_id: &str) -> Result<bool, InternalError> {
        let res = Doctor::delete_by_id(doctor_id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_doctor", e))?;

        Ok(res.rows_affected > 0)
    }

    /// Reset a doctor's document counter to 0. Administrative operation.
    pub async fn reset_serial(&self, doctor_id: &str) -> Result<(), InternalError> {
        numbering::reset_doctor_serial(&self.db, doctor_id).await
    }

    /// The doctor profile owned by an Admin2 account, if any.
    pub async fn find_by_owner(
        &self,
        user_id: &str,
    ) -> Result<Option<doctor::Model>, InternalError> {
        Doctor::find()
            .filter(doctor::Column::CreatedBy.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_doctor_by_owner", e))
    }

    /// Make sure an Admin2 account appears in the doctors list: reuse the
    /// profile they own or create one with a freshly assigned prefix.
    pub async fn ensure_profile_for(
        &self,
        user: &user::Model,
    ) -> Result<doctor::Model, InternalError> {
        if let Some(existing) = self.find_by_owner(&user.id).await? {
            return Ok(existing);
        }

        let full_name = if user.full_name.trim().is_empty() {
            user.username.clone()
        } else {
            user.full_name.clone()
        };

        self.create(NewDoctor {
            full_name,
            department: "Admin 2".to_string(),
            phone: String::new(),
            room_number: String::new(),
            code_prefix: None,
            created_by: Some(user.id.clone()),
        })
        .await
    }
}

impl std::fmt::Debug for DoctorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoctorStore").field("db", &"<connection>").finish()
    }
}
