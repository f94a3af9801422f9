use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::internal::{DatabaseError, InternalError, NumberingError};
use crate::services::numbering;
use crate::stores::PatientStore;
use crate::types::db::appointment::{self, AppointmentStatus, Entity as Appointment};
use crate::types::db::{doctor, patient};

/// A freshly queued appointment with its resolved parties and document code.
pub struct CreatedAppointment {
    pub appointment: appointment::Model,
    pub doctor: doctor::Model,
    pub patient: patient::Model,
    pub doc_code: String,
}

/// AppointmentStore manages the appointment queue and document numbering
pub struct AppointmentStore {
    db: DatabaseConnection,
    patient_store: Arc<PatientStore>,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection, patient_store: Arc<PatientStore>) -> Self {
        Self { db, patient_store }
    }

    /// Queue an appointment: resolve the patient by name, stamp today's
    /// date/time, allocate the doctor's next document number, and insert —
    /// all inside one transaction so the counter increment commits together
    /// with the record carrying it.
    pub async fn create(
        &self,
        doctor_id: &str,
        patient_name: &str,
        patient_phone: Option<&str>,
        created_by: &str,
    ) -> Result<CreatedAppointment, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let doctor = doctor::Entity::find_by_id(doctor_id)
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("get_doctor", e))?
            .ok_or_else(|| NumberingError::entity_unavailable(format!("doctor {}", doctor_id)))?;

        let patient = self
            .patient_store
            .get_or_create_by_name(&txn, patient_name.trim(), patient_phone)
            .await?;

        let serial = numbering::allocate_doctor_serial(&txn, doctor_id).await?;

        let now_local = Local::now();
        let model = appointment::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            doctor_id: Set(doctor.id.clone()),
            patient_id: Set(patient.id.clone()),
            date: Set(now_local.date_naive()),
            time: Set(now_local.time()),
            status: Set(AppointmentStatus::Waiting),
            doc_no: Set(Some(serial)),
            service_price: Set(None),
            created_by: Set(Some(created_by.to_string())),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| InternalError::database("insert_appointment", e))?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        let doc_code = numbering::format_code(&doctor.code_prefix, serial);

        Ok(CreatedAppointment {
            appointment: inserted,
            doctor,
            patient,
            doc_code,
        })
    }

    pub async fn get(
        &self,
        appointment_id: &str,
    ) -> Result<Option<appointment::Model>, InternalError> {
        Appointment::find_by_id(appointment_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_appointment", e))
    }

    /// Most recent appointments first.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<appointment::Model>, InternalError> {
        Appointment::find()
            .order_by_desc(appointment::Column::Date)
            .order_by_desc(appointment::Column::Time)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_appointments", e))
    }

    /// Queue for the price setter: appointments without a service price.
    pub async fn pending_price(&self, limit: u64) -> Result<Vec<appointment::Model>, InternalError> {
        Appointment::find()
            .filter(appointment::Column::ServicePrice.is_null())
            .order_by_desc(appointment::Column::Date)
            .order_by_desc(appointment::Column::Time)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_pending_price", e))
    }

    /// Queue for the cashier: priced appointments with no payment yet.
    pub async fn cashier_queue(
        &self,
        paid_appointment_ids: &[String],
        limit: u64,
    ) -> Result<Vec<appointment::Model>, InternalError> {
        let mut find = Appointment::find()
            .filter(appointment::Column::ServicePrice.is_not_null());

        if !paid_appointment_ids.is_empty() {
            find = find.filter(appointment::Column::Id.is_not_in(paid_appointment_ids.iter().cloned()));
        }

        find.order_by_desc(appointment::Column::Date)
            .order_by_desc(appointment::Column::Time)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_cashier_queue", e))
    }

    /// Record the service price. Returns None for an unknown appointment.
    pub async fn set_price(
        &self,
        appointment_id: &str,
        amount: Decimal,
    ) -> Result<Option<appointment::Model>, InternalError> {
        let Some(appt) = self.get(appointment_id).await? else {
            return Ok(None);
        };

        let mut active: appointment::ActiveModel = appt.into();
        active.service_price = Set(Some(amount));

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_appointment_price", e))?;

        Ok(Some(updated))
    }

    /// Appointments for one doctor with optional date range and patient-name
    /// filter, newest first.
    pub async fn for_doctor(
        &self,
        doctor_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        patient_query: Option<&str>,
        limit: u64,
    ) -> Result<Vec<appointment::Model>, InternalError> {
        let mut find = Appointment::find().filter(appointment::Column::DoctorId.eq(doctor_id));

        if let Some(start) = start {
            find = find.filter(appointment::Column::Date.gte(start));
        }
        if let Some(end) = end {
            find = find.filter(appointment::Column::Date.lte(end));
        }

        if let Some(q) = patient_query.filter(|q| !q.is_empty()) {
            let matching: Vec<String> = patient::Entity::find()
                .filter(patient::Column::FullName.contains(q))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("find_patients_by_name", e))?
                .into_iter()
                .map(|p| p.id)
                .collect();
            find = find.filter(appointment::Column::PatientId.is_in(matching));
        }

        find.order_by_desc(appointment::Column::Date)
            .order_by_desc(appointment::Column::Time)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_doctor_appointments", e))
    }

    /// Batch-load the doctors and patients referenced by a set of
    /// appointments, keyed by id. Used to resolve display names.
    pub async fn resolve_parties(
        &self,
        appointments: &[appointment::Model],
    ) -> Result<(HashMap<String, doctor::Model>, HashMap<String, patient::Model>), InternalError>
    {
        let doctor_ids: Vec<String> = appointments.iter().map(|a| a.doctor_id.clone()).collect();
        let patient_ids: Vec<String> = appointments.iter().map(|a| a.patient_id.clone()).collect();

        let doctors = if doctor_ids.is_empty() {
            Vec::new()
        } else {
            doctor::Entity::find()
                .filter(doctor::Column::Id.is_in(doctor_ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("load_appointment_doctors", e))?
        };

        let patients = if patient_ids.is_empty() {
            Vec::new()
        } else {
            patient::Entity::find()
                .filter(patient::Column::Id.is_in(patient_ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("load_appointment_patients", e))?
        };

        Ok((
            doctors.into_iter().map(|d| (d.id.clone(), d)).collect(),
            patients.into_iter().map(|p| (p.id.clone(), p)).collect(),
        ))
    }
}

impl std::fmt::Debug for AppointmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppointmentStore")
            .field("db", &"<connection>")
            .finish()
    }
}
