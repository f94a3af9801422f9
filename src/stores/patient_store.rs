use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::errors::internal::InternalError;
use crate::types::db::patient::{self, Entity as Patient};

/// PatientStore manages the patient registry
pub struct PatientStore {
    db: DatabaseConnection,
}

impl PatientStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, patient_id: &str) -> Result<Option<patient::Model>, InternalError> {
        Patient::find_by_id(patient_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_patient", e))
    }

    /// Most recently registered patients first.
    pub async fn list(&self, limit: u64) -> Result<Vec<patient::Model>, InternalError> {
        Patient::find()
            .order_by_desc(patient::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_patients", e))
    }

    pub async fn create(
        &self,
        full_name: String,
        phone: String,
        address: String,
        birth_date: Option<NaiveDate>,
    ) -> Result<patient::Model, InternalError> {
        let model = patient::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            full_name: Set(full_name),
            phone: Set(phone),
            address: Set(address),
            birth_date: Set(birth_date),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_patient", e))
    }

    /// Resolve a patient by exact name, creating a minimal record when the
    /// name is unknown. Used by appointment intake, which works from the name
    /// the receptionist types. Takes the caller's connection so it can join
    /// the appointment's transaction.
    pub async fn get_or_create_by_name<C: ConnectionTrait>(
        &self,
        conn: &C,
        full_name: &str,
        phone: Option<&str>,
    ) -> Result<patient::Model, InternalError> {
        let existing = Patient::find()
            .filter(patient::Column::FullName.eq(full_name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_patient_by_name", e))?;

        if let Some(found) = existing {
            return Ok(found);
        }

        let model = patient::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            full_name: Set(full_name.to_string()),
            phone: Set(phone.unwrap_or_default().to_string()),
            address: Set(String::new()),
            birth_date: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_patient", e))
    }
}

impl std::fmt::Debug for PatientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientStore").field("db", &"<connection>").finish()
    }
}
