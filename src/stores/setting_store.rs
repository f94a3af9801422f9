use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};

use crate::errors::internal::{InternalError, SettingError};
use crate::services::numbering::{self, CLINIC_SETTINGS_ID};
use crate::types::db::clinic_setting::{self, ActiveModel, Entity as ClinicSetting};

/// Fields of the clinic settings record that administrators may edit.
/// `None` leaves the current value untouched.
pub struct SettingsUpdate {
    pub clinic_name: Option<String>,
    pub clinic_address: Option<String>,
    pub clinic_phone: Option<String>,
    pub receipt_footer: Option<String>,
}

/// SettingStore manages the clinic settings singleton row
pub struct SettingStore {
    db: DatabaseConnection,
}

impl SettingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ensure the singleton clinic_settings row exists.
    ///
    /// The migration seeds it, but a wiped table must not break settings
    /// reads or receipt numbering, so every accessor goes through here.
    async fn ensure_exists<C: ConnectionTrait>(&self, conn: &C) -> Result<(), InternalError> {
        let setting = ClinicSetting::find_by_id(CLINIC_SETTINGS_ID)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_clinic_settings_exists", e))?;

        if setting.is_none() {
            let new_setting = ActiveModel {
                id: Set(CLINIC_SETTINGS_ID),
                clinic_name: Set("Clinic".to_string()),
                clinic_address: Set(String::new()),
                clinic_phone: Set(String::new()),
                receipt_footer: Set(String::new()),
                code_prefix: Set("R".to_string()),
                receipt_serial: Set(0),
                updated_at: Set(Utc::now().timestamp()),
            };

            new_setting
                .insert(conn)
                .await
                .map_err(|e| InternalError::database("create_clinic_settings", e))?;
        }

        Ok(())
    }

    /// Get the clinic settings singleton.
    pub async fn get(&self) -> Result<clinic_setting::Model, InternalError> {
        self.get_on(&self.db).await
    }

    /// Get the clinic settings singleton through the caller's connection.
    ///
    /// Used by payment capture, which reads the receipt prefix inside the
    /// same transaction that allocates the clinic serial.
    pub async fn get_on<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<clinic_setting::Model, InternalError> {
        self.ensure_exists(conn).await?;

        ClinicSetting::find_by_id(CLINIC_SETTINGS_ID)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_clinic_settings", e))?
            .ok_or_else(|| SettingError::SingletonMissing.into())
    }

    /// Update the clinic letterhead fields.
    pub async fn update(
        &self,
        update: SettingsUpdate,
    ) -> Result<clinic_setting::Model, InternalError> {
        let setting = self.get().await?;

        let mut active: ActiveModel = setting.into();
        if let Some(clinic_name) = update.clinic_name {
            active.clinic_name = Set(clinic_name);
        }
        if let Some(clinic_address) = update.clinic_address {
            active.clinic_address = Set(clinic_address);
        }
        if let Some(clinic_phone) = update.clinic_phone {
            active.clinic_phone = Set(clinic_phone);
        }
        if let Some(receipt_footer) = update.receipt_footer {
            active.receipt_footer = Set(receipt_footer);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_clinic_settings", e))
    }

    /// Reset the clinic-wide receipt counter to 0. Administrative operation.
    pub async fn reset_serial(&self) -> Result<(), InternalError> {
        self.ensure_exists(&self.db).await?;
        numbering::reset_clinic_serial(&self.db).await
    }
}

impl std::fmt::Debug for SettingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingStore").field("db", &"<connection>").finish()
    }
}
