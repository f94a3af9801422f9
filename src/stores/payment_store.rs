use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::errors::internal::{BillingError, DatabaseError, InternalError};
use crate::services::numbering;
use crate::stores::SettingStore;
use crate::types::db::appointment;
use crate::types::db::payment::{self, Entity as Payment, PaymentMethod};

/// PaymentStore captures cashier payments and stamps clinic receipt numbers
pub struct PaymentStore {
    db: DatabaseConnection,
    setting_store: Arc<SettingStore>,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection, setting_store: Arc<SettingStore>) -> Self {
        Self { db, setting_store }
    }

    /// Capture a payment for a priced appointment.
    ///
    /// The amount is always the appointment's recorded service price. The
    /// clinic-wide receipt serial is allocated inside the insert transaction;
    /// the unique index on `appointment_id` backstops racing double submits.
    pub async fn create(
        &self,
        appt: &appointment::Model,
        method: PaymentMethod,
        cashier_id: &str,
    ) -> Result<payment::Model, InternalError> {
        let amount = appt
            .service_price
            .ok_or_else(|| BillingError::PriceNotSet(appt.id.clone()))?;

        let existing = Payment::find()
            .filter(payment::Column::AppointmentId.eq(&appt.id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_payment_by_appointment", e))?;
        if existing.is_some() {
            return Err(BillingError::AlreadyPaid(appt.id.clone()).into());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let setting = self.setting_store.get_on(&txn).await?;
        let serial = numbering::allocate_clinic_serial(&txn).await?;
        let receipt_no = numbering::format_code(&setting.code_prefix, serial);

        let model = payment::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            appointment_id: Set(appt.id.clone()),
            amount: Set(amount),
            method: Set(method),
            cashier_id: Set(Some(cashier_id.to_string())),
            receipt_no: Set(receipt_no),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = model.insert(&txn).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                InternalError::from(BillingError::AlreadyPaid(appt.id.clone()))
            } else {
                InternalError::database("insert_payment", e)
            }
        })?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        Ok(inserted)
    }

    pub async fn get(&self, payment_id: &str) -> Result<Option<payment::Model>, InternalError> {
        Payment::find_by_id(payment_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_payment", e))
    }

    pub async fn find_by_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Option<payment::Model>, InternalError> {
        Payment::find()
            .filter(payment::Column::AppointmentId.eq(appointment_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_payment_by_appointment", e))
    }

    /// Payments referencing any of the given appointments.
    pub async fn for_appointments(
        &self,
        appointment_ids: Vec<String>,
    ) -> Result<Vec<payment::Model>, InternalError> {
        if appointment_ids.is_empty() {
            return Ok(Vec::new());
        }

        Payment::find()
            .filter(payment::Column::AppointmentId.is_in(appointment_ids))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_payments_by_appointments", e))
    }

    /// All appointment ids that already carry a payment.
    pub async fn paid_appointment_ids(&self) -> Result<Vec<String>, InternalError> {
        let payments = Payment::find()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_payments", e))?;

        Ok(payments.into_iter().map(|p| p.appointment_id).collect())
    }

    /// Payments captured within `[start_ts, end_ts)`, newest first.
    pub async fn captured_between(
        &self,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Vec<payment::Model>, InternalError> {
        Payment::find()
            .filter(payment::Column::CreatedAt.gte(start_ts))
            .filter(payment::Column::CreatedAt.lt(end_ts))
            .order_by_desc(payment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_payments_between", e))
    }
}

impl std::fmt::Debug for PaymentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentStore")
            .field("db", &"<connection>")
            .finish()
    }
}
