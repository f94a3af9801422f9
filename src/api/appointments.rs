use std::collections::HashSet;
use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::errors::api::access::AccessError;
use crate::errors::internal::InternalError;
use crate::services::numbering;
use crate::services::RoleGuard;
use crate::stores::{AppointmentStore, DoctorStore, PaymentStore, SettingStore};
use crate::types::db::appointment;
use crate::types::dto::appointments::{
    AppointmentReceiptResponse, AppointmentResponse, CreateAppointmentRequest, SetPriceRequest,
};
use crate::types::dto::settings::ClinicInfo;
use crate::types::internal::auth::AuthedUser;
use crate::types::internal::role::Role;

const APPOINTMENT_LIST_LIMIT: u64 = 100;

const CREATE_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin1, Role::Staff];
const LIST_ROLES: &[Role] = &[
    Role::Creator,
    Role::Admin,
    Role::Doctor,
    Role::Staff,
    Role::Admin2,
    Role::Admin3,
];
const PRICE_QUEUE_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin2];
const CASHIER_QUEUE_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin3];
const SET_PRICE_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin2];
const RECEIPT_ROLES: &[Role] = &[
    Role::Creator,
    Role::Admin,
    Role::Admin1,
    Role::Admin2,
    Role::Admin3,
    Role::Doctor,
    Role::Staff,
];

/// Resolve names and payment state for a batch of appointment rows.
pub(crate) async fn build_rows(
    appointment_store: &AppointmentStore,
    payment_store: &PaymentStore,
    appointments: Vec<appointment::Model>,
) -> Result<Vec<AppointmentResponse>, InternalError> {
    let (doctors, patients) = appointment_store.resolve_parties(&appointments).await?;

    let paid: HashSet<String> = payment_store
        .for_appointments(appointments.iter().map(|a| a.id.clone()).collect())
        .await?
        .into_iter()
        .map(|p| p.appointment_id)
        .collect();

    let rows = appointments
        .into_iter()
        .map(|a| {
            let doctor = doctors.get(&a.doctor_id);
            let patient = patients.get(&a.patient_id);
            let doc_code = match (doctor, a.doc_no) {
                (Some(d), Some(n)) => Some(numbering::format_code(&d.code_prefix, n)),
                _ => None,
            };

            AppointmentResponse {
                id: a.id.clone(),
                doctor_id: a.doctor_id.clone(),
                doctor_name: doctor.map(|d| d.full_name.clone()).unwrap_or_default(),
                patient_id: a.patient_id.clone(),
                patient_name: patient.map(|p| p.full_name.clone()).unwrap_or_default(),
                date: a.date,
                time: a.time,
                status: a.status,
                doc_no: a.doc_no,
                doc_code,
                service_price: a.service_price,
                paid: paid.contains(&a.id),
                created_at: a.created_at,
            }
        })
        .collect();

    Ok(rows)
}

/// Appointment queue API endpoints
pub struct AppointmentsApi {
    guard: Arc<RoleGuard>,
    appointment_store: Arc<AppointmentStore>,
    doctor_store: Arc<DoctorStore>,
    payment_store: Arc<PaymentStore>,
    setting_store: Arc<SettingStore>,
}

impl AppointmentsApi {
    pub fn new(
        guard: Arc<RoleGuard>,
        appointment_store: Arc<AppointmentStore>,
        doctor_store: Arc<DoctorStore>,
        payment_store: Arc<PaymentStore>,
        setting_store: Arc<SettingStore>,
    ) -> Self {
        Self {
            guard,
            appointment_store,
            doctor_store,
            payment_store,
            setting_store,
        }
    }

    /// An Admin2 may only price appointments of the doctor profile they own.
    async fn check_price_ownership(
        &self,
        actor: &AuthedUser,
        appt: &appointment::Model,
    ) -> Result<(), AccessError> {
        if actor.role != Role::Admin2 || actor.is_superuser {
            return Ok(());
        }

        let owned = self.doctor_store.find_by_owner(&actor.user_id).await?;
        match owned {
            Some(d) if d.id == appt.doctor_id => Ok(()),
            _ => Err(AccessError::forbidden(
                "Price setting is limited to your own doctor profile",
            )),
        }
    }
}

/// API tags for appointment endpoints
#[derive(Tags)]
enum AppointmentTags {
    /// Appointment queue
    Appointments,
}

#[OpenApi(prefix_path = "/appointments")]
impl AppointmentsApi {
    /// Queue an appointment
    ///
    /// Resolves the patient by name (creating a record when the name is
    /// unknown), stamps today's date and time, and allocates the doctor's
    /// next document number in the same transaction as the insert.
    #[oai(path = "/", method = "post", tag = "AppointmentTags::Appointments")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreateAppointmentRequest>,
    ) -> Result<Json<AppointmentResponse>, AccessError> {
        let actor = self.guard.authorize(req, CREATE_ROLES).await?;

        let body = body.0;
        if body.patient_name.trim().is_empty() {
            return Err(AccessError::bad_request("Patient name must not be empty"));
        }

        let created = self
            .appointment_store
            .create(
                &body.doctor_id,
                &body.patient_name,
                body.patient_phone.as_deref(),
                &actor.user_id,
            )
            .await?;

        tracing::info!(
            doctor = %created.doctor.full_name,
            doc_code = %created.doc_code,
            "appointment queued"
        );

        let a = created.appointment;
        Ok(Json(AppointmentResponse {
            id: a.id,
            doctor_id: a.doctor_id,
            doctor_name: created.doctor.full_name,
            patient_id: a.patient_id,
            patient_name: created.patient.full_name,
            date: a.date,
            time: a.time,
            status: a.status,
            doc_no: a.doc_no,
            doc_code: Some(created.doc_code),
            service_price: a.service_price,
            paid: false,
            created_at: a.created_at,
        }))
    }

    /// List recent appointments
    #[oai(path = "/", method = "get", tag = "AppointmentTags::Appointments")]
    async fn list(&self, req: &Request) -> Result<Json<Vec<AppointmentResponse>>, AccessError> {
        self.guard.authorize(req, LIST_ROLES).await?;

        let appointments = self
            .appointment_store
            .list_recent(APPOINTMENT_LIST_LIMIT)
            .await?;
        let rows = build_rows(&self.appointment_store, &self.payment_store, appointments).await?;

        Ok(Json(rows))
    }

    /// Price queue: appointments without a service price
    #[oai(path = "/pending-price", method = "get", tag = "AppointmentTags::Appointments")]
    async fn pending_price(
        &self,
        req: &Request,
    ) -> Result<Json<Vec<AppointmentResponse>>, AccessError> {
        self.guard.authorize(req, PRICE_QUEUE_ROLES).await?;

        let appointments = self
            .appointment_store
            .pending_price(APPOINTMENT_LIST_LIMIT)
            .await?;
        let rows = build_rows(&self.appointment_store, &self.payment_store, appointments).await?;

        Ok(Json(rows))
    }

    /// Cashier queue: priced appointments awaiting payment
    #[oai(path = "/cashier-queue", method = "get", tag = "AppointmentTags::Appointments")]
    async fn cashier_queue(
        &self,
        req: &Request,
    ) -> Result<Json<Vec<AppointmentResponse>>, AccessError> {
        self.guard.authorize(req, CASHIER_QUEUE_ROLES).await?;

        let paid = self.payment_store.paid_appointment_ids().await?;
        let appointments = self
            .appointment_store
            .cashier_queue(&paid, APPOINTMENT_LIST_LIMIT)
            .await?;
        let rows = build_rows(&self.appointment_store, &self.payment_store, appointments).await?;

        Ok(Json(rows))
    }

    /// Record the service price for an appointment
    #[oai(path = "/:id/price", method = "put", tag = "AppointmentTags::Appointments")]
    async fn set_price(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<SetPriceRequest>,
    ) -> Result<Json<AppointmentResponse>, AccessError> {
        let actor = self.guard.authorize(req, SET_PRICE_ROLES).await?;

        if body.amount.is_sign_negative() {
            return Err(AccessError::bad_request("Price must not be negative"));
        }

        let appt = self
            .appointment_store
            .get(&id.0)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("Appointment not found: {}", id.0)))?;

        self.check_price_ownership(&actor, &appt).await?;

        let updated = self
            .appointment_store
            .set_price(&appt.id, body.amount)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("Appointment not found: {}", id.0)))?;

        let rows = build_rows(&self.appointment_store, &self.payment_store, vec![updated]).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| AccessError::internal("Updated appointment vanished"))?;

        Ok(Json(row))
    }

    /// Printable receipt data for an appointment
    #[oai(path = "/:id/receipt", method = "get", tag = "AppointmentTags::Appointments")]
    async fn receipt(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<AppointmentReceiptResponse>, AccessError> {
        self.guard.authorize(req, RECEIPT_ROLES).await?;

        let appt = self
            .appointment_store
            .get(&id.0)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("Appointment not found: {}", id.0)))?;

        let (doctors, patients) = self
            .appointment_store
            .resolve_parties(std::slice::from_ref(&appt))
            .await?;
        let doctor = doctors
            .get(&appt.doctor_id)
            .ok_or_else(|| AccessError::not_found("Doctor record no longer exists"))?;
        let patient = patients
            .get(&appt.patient_id)
            .ok_or_else(|| AccessError::not_found("Patient record no longer exists"))?;

        let setting = self.setting_store.get().await?;

        let doc_code = appt
            .doc_no
            .map(|n| numbering::format_code(&doctor.code_prefix, n))
            .unwrap_or_default();

        Ok(Json(AppointmentReceiptResponse {
            doc_code,
            date: appt.date,
            time: appt.time,
            doctor_name: doctor.full_name.clone(),
            department: doctor.department.clone(),
            room_number: doctor.room_number.clone(),
            patient_name: patient.full_name.clone(),
            service_price: appt.service_price,
            clinic: ClinicInfo::from(&setting),
        }))
    }
}
