use std::sync::Arc;

use chrono::{Local, NaiveDate};
use poem::Request;
use poem_openapi::{param::Path, param::Query, payload::Json, OpenApi, Tags};

use crate::api::appointments::build_rows;
use crate::errors::api::access::AccessError;
use crate::services::RoleGuard;
use crate::stores::doctor_store::{DoctorUpdate, NewDoctor};
use crate::stores::{AppointmentStore, DoctorStore, PaymentStore, ReportStore};
use crate::types::dto::appointments::AppointmentResponse;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::doctors::{
    CreateDoctorRequest, DoctorListItem, DoctorResponse, UpdateDoctorRequest,
};
use crate::types::internal::role::Role;

const DOCTOR_APPOINTMENTS_LIMIT: u64 = 200;

const LIST_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin1];
const MANAGE_ROLES: &[Role] = &[Role::Creator];
const DOCTOR_APPOINTMENTS_ROLES: &[Role] = &[
    Role::Creator,
    Role::Admin,
    Role::Admin1,
    Role::Admin2,
    Role::Admin3,
];

/// Doctor administration API endpoints
pub struct DoctorsApi {
    guard: Arc<RoleGuard>,
    doctor_store: Arc<DoctorStore>,
    appointment_store: Arc<AppointmentStore>,
    payment_store: Arc<PaymentStore>,
    report_store: Arc<ReportStore>,
}

impl DoctorsApi {
    pub fn new(
        guard: Arc<RoleGuard>,
        doctor_store: Arc<DoctorStore>,
        appointment_store: Arc<AppointmentStore>,
        payment_store: Arc<PaymentStore>,
        report_store: Arc<ReportStore>,
    ) -> Self {
        Self {
            guard,
            doctor_store,
            appointment_store,
            payment_store,
            report_store,
        }
    }
}

/// Normalize a caller-supplied prefix: uppercase, at most two characters.
fn normalize_prefix(prefix: &str) -> Option<String> {
    let cleaned: String = prefix.trim().to_uppercase().chars().take(2).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// API tags for doctor endpoints
#[derive(Tags)]
enum DoctorTags {
    /// Doctor administration
    Doctors,
}

#[OpenApi(prefix_path = "/doctors")]
impl DoctorsApi {
    /// List doctors with appointment activity counts
    #[oai(path = "/", method = "get", tag = "DoctorTags::Doctors")]
    async fn list(
        &self,
        req: &Request,
        q: Query<Option<String>>,
    ) -> Result<Json<Vec<DoctorListItem>>, AccessError> {
        self.guard.authorize(req, LIST_ROLES).await?;

        let doctors = self.doctor_store.list(q.0.as_deref()).await?;
        let totals = self.report_store.doctor_appointment_totals().await?;
        let today = self
            .report_store
            .doctor_appointment_totals_on(Local::now().date_naive())
            .await?;

        let rows = doctors
            .into_iter()
            .map(|d| {
                let appointments_total = totals.get(&d.id).copied().unwrap_or(0);
                let appointments_today = today.get(&d.id).copied().unwrap_or(0);
                DoctorListItem {
                    doctor: DoctorResponse::from(d),
                    appointments_total,
                    appointments_today,
                }
            })
            .collect();

        Ok(Json(rows))
    }

    /// Create a doctor
    ///
    /// When no receipt code prefix is supplied, the first unused one is
    /// assigned automatically.
    #[oai(path = "/", method = "post", tag = "DoctorTags::Doctors")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreateDoctorRequest>,
    ) -> Result<Json<DoctorResponse>, AccessError> {
        let actor = self.guard.authorize(req, MANAGE_ROLES).await?;

        let body = body.0;
        let full_name = body.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AccessError::bad_request("Doctor name must not be empty"));
        }

        let doctor = self
            .doctor_store
            .create(NewDoctor {
                full_name,
                department: body.department,
                phone: body.phone.unwrap_or_default(),
                room_number: body.room_number.unwrap_or_default(),
                code_prefix: body.code_prefix.as_deref().and_then(normalize_prefix),
                created_by: Some(actor.user_id),
            })
            .await?;

        Ok(Json(DoctorResponse::from(doctor)))
    }

    /// Update a doctor
    #[oai(path = "/:id", method = "put", tag = "DoctorTags::Doctors")]
    async fn update(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<UpdateDoctorRequest>,
    ) -> Result<Json<DoctorResponse>, AccessError> {
        self.guard.authorize(req, MANAGE_ROLES).await?;

        let body = body.0;
        let doctor = self
            .doctor_store
            .update(
                &id.0,
                DoctorUpdate {
                    full_name: body.full_name,
                    department: body.department,
                    phone: body.phone,
                    room_number: body.room_number,
                    code_prefix: body.code_prefix.as_deref().and_then(normalize_prefix),
                },
            )
            .await?
            .ok_or_else(|| AccessError::not_found(format!("Doctor not found: {}", id.0)))?;

        Ok(Json(DoctorResponse::from(doctor)))
    }

    /// Delete a doctor
    #[oai(path = "/:id", method = "delete", tag = "DoctorTags::Doctors")]
    async fn delete(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, AccessError> {
        self.guard.authorize(req, MANAGE_ROLES).await?;

        let deleted = self.doctor_store.delete(&id.0).await?;
        if !deleted {
            return Err(AccessError::not_found(format!("Doctor not found: {}", id.0)));
        }

        Ok(Json(MessageResponse {
            message: "Doctor deleted".to_string(),
        }))
    }

    /// Reset the doctor's document counter to 0
    #[oai(path = "/:id/reset-counter", method = "post", tag = "DoctorTags::Doctors")]
    async fn reset_counter(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, AccessError> {
        let actor = self.guard.authorize(req, MANAGE_ROLES).await?;

        self.doctor_store.reset_serial(&id.0).await?;

        tracing::info!(doctor_id = %id.0, by = %actor.username, "document counter reset");

        Ok(Json(MessageResponse {
            message: "Document counter reset".to_string(),
        }))
    }

    /// Appointments for one doctor, with optional date range and patient filter
    #[oai(path = "/:id/appointments", method = "get", tag = "DoctorTags::Doctors")]
    async fn appointments(
        &self,
        req: &Request,
        id: Path<String>,
        start: Query<Option<NaiveDate>>,
        end: Query<Option<NaiveDate>>,
        patient: Query<Option<String>>,
    ) -> Result<Json<Vec<AppointmentResponse>>, AccessError> {
        self.guard.authorize(req, DOCTOR_APPOINTMENTS_ROLES).await?;

        if self.doctor_store.get(&id.0).await?.is_none() {
            return Err(AccessError::not_found(format!("Doctor not found: {}", id.0)));
        }

        let appointments = self
            .appointment_store
            .for_doctor(
                &id.0,
                start.0,
                end.0,
                patient.0.as_deref(),
                DOCTOR_APPOINTMENTS_LIMIT,
            )
            .await?;
        let rows = build_rows(&self.appointment_store, &self.payment_store, appointments).await?;

        Ok(Json(rows))
    }
}
