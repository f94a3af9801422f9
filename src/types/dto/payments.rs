use poem_openapi::Object;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::db::payment::{self, PaymentMethod};
use crate::types::dto::settings::ClinicInfo;

/// Request model for capturing a payment. The amount always comes from the
/// appointment's recorded service price; the cashier only picks the method.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Payment method
    pub method: PaymentMethod,
}

/// Payment record
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Payment ID (UUID)
    pub id: String,

    /// Appointment ID (UUID)
    pub appointment_id: String,

    /// Amount captured
    pub amount: Decimal,

    /// Payment method
    pub method: PaymentMethod,

    /// Cashier user ID
    pub cashier_id: Option<String>,

    /// Formatted receipt number from the clinic-wide counter
    pub receipt_no: String,

    /// Capture time (Unix timestamp)
    pub created_at: i64,
}

impl From<payment::Model> for PaymentResponse {
    fn from(p: payment::Model) -> Self {
        Self {
            id: p.id,
            appointment_id: p.appointment_id,
            amount: p.amount,
            method: p.method,
            cashier_id: p.cashier_id,
            receipt_no: p.receipt_no,
            created_at: p.created_at,
        }
    }
}

/// Printable receipt data for a captured payment
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PaymentReceiptResponse {
    /// Formatted receipt number
    pub receipt_no: String,

    /// Amount captured
    pub amount: Decimal,

    /// Payment method
    pub method: PaymentMethod,

    /// Capture time (Unix timestamp)
    pub paid_at: i64,

    /// Patient full name
    pub patient_name: String,

    /// Doctor full name
    pub doctor_name: String,

    /// Appointment document code
    pub doc_code: Option<String>,

    /// Clinic letterhead fields
    pub clinic: ClinicInfo,
}
