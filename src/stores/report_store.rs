use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::errors::internal::InternalError;
use crate::types::db::payment::PaymentMethod;
use crate::types::db::{appointment, doctor, patient, payment, user};
use crate::types::internal::role::Role;

/// Appointment count grouped by doctor.
#[derive(FromQueryResult, Debug)]
struct DoctorCountRow {
    doctor_id: String,
    total: i64,
}

/// One captured payment in the cashier report, with names resolved.
#[derive(Debug)]
pub struct CashierReportEntry {
    pub paid_at: i64,
    pub patient_name: String,
    pub doctor_name: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub cashier_username: String,
    pub receipt_no: String,
}

/// ReportStore runs the read-only aggregate queries behind the dashboard
pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn doctors_count(&self) -> Result<u64, InternalError> {
        doctor::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_doctors", e))
    }

    pub async fn patients_count(&self) -> Result<u64, InternalError> {
        patient::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_patients", e))
    }

    pub async fn appointments_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, InternalError> {
        appointment::Entity::find()
            .filter(appointment::Column::Date.gte(start))
            .filter(appointment::Column::Date.lte(end))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_appointments_in_range", e))
    }

    async fn grouped_doctor_counts(
        &self,
        day_range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<DoctorCountRow>, InternalError> {
        let mut find = appointment::Entity::find();

        if let Some((start, end)) = day_range {
            find = find
                .filter(appointment::Column::Date.gte(start))
                .filter(appointment::Column::Date.lte(end));
        }

        find.select_only()
            .column(appointment::Column::DoctorId)
            .column_as(appointment::Column::Id.count(), "total")
            .group_by(appointment::Column::DoctorId)
            .into_model::<DoctorCountRow>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("count_appointments_per_doctor", e))
    }

    /// Appointment totals per doctor over all time, keyed by doctor id.
    pub async fn doctor_appointment_totals(&self) -> Result<HashMap<String, i64>, InternalError> {
        let rows = self.grouped_doctor_counts(None).await?;
        Ok(rows.into_iter().map(|r| (r.doctor_id, r.total)).collect())
    }

    /// Appointment totals per doctor for a single day, keyed by doctor id.
    pub async fn doctor_appointment_totals_on(
        &self,
        day: NaiveDate,
    ) -> Result<HashMap<String, i64>, InternalError> {
        let rows = self.grouped_doctor_counts(Some((day, day))).await?;
        Ok(rows.into_iter().map(|r| (r.doctor_id, r.total)).collect())
    }

    /// Per-doctor appointment totals within a date range, busiest first,
    /// ties broken by doctor name.
    pub async fn per_doctor_activity(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(doctor::Model, i64)>, InternalError> {
        let counts = self.grouped_doctor_counts(Some((start, end))).await?;

        let ids: Vec<String> = counts.iter().map(|r| r.doctor_id.clone()).collect();
        let doctors: HashMap<String, doctor::Model> = if ids.is_empty() {
            HashMap::new()
        } else {
            doctor::Entity::find()
                .filter(doctor::Column::Id.is_in(ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("load_report_doctors", e))?
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect()
        };

        let mut rows: Vec<(doctor::Model, i64)> = counts
            .into_iter()
            .filter_map(|r| doctors.get(&r.doctor_id).cloned().map(|d| (d, r.total)))
            .collect();
        rows.sort_by(|(a, at), (b, bt)| bt.cmp(at).then_with(|| a.full_name.cmp(&b.full_name)));

        Ok(rows)
    }

    /// Payments captured by cashier (Admin3) accounts within
    /// `[start_ts, end_ts)`, newest first, with names resolved.
    pub async fn cashier_report(
        &self,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Vec<CashierReportEntry>, InternalError> {
        let cashiers: HashMap<String, String> = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Admin3))
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_cashier_users", e))?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        if cashiers.is_empty() {
            return Ok(Vec::new());
        }

        let payments = payment::Entity::find()
            .filter(payment::Column::CreatedAt.gte(start_ts))
            .filter(payment::Column::CreatedAt.lt(end_ts))
            .filter(payment::Column::CashierId.is_in(cashiers.keys().cloned()))
            .order_by_desc(payment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_cashier_payments", e))?;

        let appointment_ids: Vec<String> =
            payments.iter().map(|p| p.appointment_id.clone()).collect();
        let appointments: HashMap<String, appointment::Model> = if appointment_ids.is_empty() {
            HashMap::new()
        } else {
            appointment::Entity::find()
                .filter(appointment::Column::Id.is_in(appointment_ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("load_report_appointments", e))?
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect()
        };

        let doctor_ids: Vec<String> =
            appointments.values().map(|a| a.doctor_id.clone()).collect();
        let doctors: HashMap<String, String> = if doctor_ids.is_empty() {
            HashMap::new()
        } else {
            doctor::Entity::find()
                .filter(doctor::Column::Id.is_in(doctor_ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("load_report_doctors", e))?
                .into_iter()
                .map(|d| (d.id, d.full_name))
                .collect()
        };

        let patient_ids: Vec<String> =
            appointments.values().map(|a| a.patient_id.clone()).collect();
        let patients: HashMap<String, String> = if patient_ids.is_empty() {
            HashMap::new()
        } else {
            patient::Entity::find()
                .filter(patient::Column::Id.is_in(patient_ids))
                .all(&self.db)
                .await
                .map_err(|e| InternalError::database("load_report_patients", e))?
                .into_iter()
                .map(|p| (p.id, p.full_name))
                .collect()
        };

        let entries = payments
            .into_iter()
            .map(|p| {
                let appt = appointments.get(&p.appointment_id);
                let doctor_name = appt
                    .and_then(|a| doctors.get(&a.doctor_id).cloned())
                    .unwrap_or_default();
                let patient_name = appt
                    .and_then(|a| patients.get(&a.patient_id).cloned())
                    .unwrap_or_default();
                let cashier_username = p
                    .cashier_id
                    .as_ref()
                    .and_then(|id| cashiers.get(id).cloned())
                    .unwrap_or_default();

                CashierReportEntry {
                    paid_at: p.created_at,
                    patient_name,
                    doctor_name,
                    amount: p.amount,
                    method: p.method,
                    cashier_username,
                    receipt_no: p.receipt_no,
                }
            })
            .collect();

        Ok(entries)
    }
}

impl std::fmt::Debug for ReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStore").field("db", &"<connection>").finish()
    }
}
