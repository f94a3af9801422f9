use std::sync::Arc;

use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::errors::api::access::AccessError;
use crate::services::numbering;
use crate::services::RoleGuard;
use crate::stores::{AppointmentStore, PaymentStore, SettingStore};
use crate::types::dto::payments::{CreatePaymentRequest, PaymentReceiptResponse, PaymentResponse};
use crate::types::dto::settings::ClinicInfo;
use crate::types::internal::role::Role;

const CAPTURE_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin3];
const RECEIPT_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin3];

/// Cashier payment API endpoints
pub struct PaymentsApi {
    guard: Arc<RoleGuard>,
    payment_store: Arc<PaymentStore>,
    appointment_store: Arc<AppointmentStore>,
    setting_store: Arc<SettingStore>,
}

impl PaymentsApi {
    pub fn new(
        guard: Arc<RoleGuard>,
        payment_store: Arc<PaymentStore>,
        appointment_store: Arc<AppointmentStore>,
        setting_store: Arc<SettingStore>,
    ) -> Self {
        Self {
            guard,
            payment_store,
            appointment_store,
            setting_store,
        }
    }
}

/// API tags for payment endpoints
#[derive(Tags)]
enum PaymentTags {
    /// Cashier payments
    Payments,
}

#[OpenApi]
impl PaymentsApi {
    /// Capture a payment for a priced appointment
    ///
    /// The amount is always the appointment's recorded service price. The
    /// clinic-wide receipt serial is allocated inside the insert transaction.
    #[oai(
        path = "/appointments/:id/payment",
        method = "post",
        tag = "PaymentTags::Payments"
    )]
    async fn capture(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<CreatePaymentRequest>,
    ) -> Result<Json<PaymentResponse>, AccessError> {
        let actor = self.guard.authorize(req, CAPTURE_ROLES).await?;

        let appt = self
            .appointment_store
            .get(&id.0)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("Appointment not found: {}", id.0)))?;

        let payment = self
            .payment_store
            .create(&appt, body.method, &actor.user_id)
            .await?;

        tracing::info!(
            receipt_no = %payment.receipt_no,
            cashier = %actor.username,
            "payment captured"
        );

        Ok(Json(PaymentResponse::from(payment)))
    }

    /// Printable receipt data for a captured payment
    #[oai(path = "/payments/:id/receipt", method = "get", tag = "PaymentTags::Payments")]
    async fn receipt(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<PaymentReceiptResponse>, AccessError> {
        self.guard.authorize(req, RECEIPT_ROLES).await?;

        let payment = self
            .payment_store
            .get(&id.0)
            .await?
            .ok_or_else(|| AccessError::not_found(format!("Payment not found: {}", id.0)))?;

        let appt = self
            .appointment_store
            .get(&payment.appointment_id)
            .await?
            .ok_or_else(|| AccessError::not_found("Appointment record no longer exists"))?;

        let (doctors, patients) = self
            .appointment_store
            .resolve_parties(std::slice::from_ref(&appt))
            .await?;
        let doctor = doctors.get(&appt.doctor_id);
        let patient = patients.get(&appt.patient_id);

        let setting = self.setting_store.get().await?;

        let doc_code = match (doctor, appt.doc_no) {
            (Some(d), Some(n)) => Some(numbering::format_code(&d.code_prefix, n)),
            _ => None,
        };

        Ok(Json(PaymentReceiptResponse {
            receipt_no: payment.receipt_no,
            amount: payment.amount,
            method: payment.method,
            paid_at: payment.created_at,
            patient_name: patient.map(|p| p.full_name.clone()).unwrap_or_default(),
            doctor_name: doctor.map(|d| d.full_name.clone()).unwrap_or_default(),
            doc_code,
            clinic: ClinicInfo::from(&setting),
        }))
    }
}
