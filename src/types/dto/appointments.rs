use chrono::{NaiveDate, NaiveTime};
use poem_openapi::Object;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::db::appointment::AppointmentStatus;
use crate::types::dto::settings::ClinicInfo;

/// Request model for queueing an appointment
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    /// Doctor ID (UUID)
    pub doctor_id: String,

    /// Patient full name; an unknown name creates a new patient record
    pub patient_name: String,

    /// Patient phone number, used only when a new patient record is created
    pub patient_phone: Option<String>,
}

/// Request model for setting the service price
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetPriceRequest {
    /// Service price
    pub amount: Decimal,
}

/// Appointment record with resolved names
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AppointmentResponse {
    /// Appointment ID (UUID)
    pub id: String,

    /// Doctor ID (UUID)
    pub doctor_id: String,

    /// Doctor full name
    pub doctor_name: String,

    /// Patient ID (UUID)
    pub patient_id: String,

    /// Patient full name
    pub patient_name: String,

    /// Appointment date
    pub date: NaiveDate,

    /// Appointment time
    pub time: NaiveTime,

    /// Queue status
    pub status: AppointmentStatus,

    /// Sequential document number within the doctor's counter
    pub doc_no: Option<i64>,

    /// Formatted document code (prefix + zero-padded number)
    pub doc_code: Option<String>,

    /// Service price; unset until the price-setter records it
    pub service_price: Option<Decimal>,

    /// Whether a payment has been captured
    pub paid: bool,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

/// Printable receipt data for an appointment
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AppointmentReceiptResponse {
    /// Formatted document code
    pub doc_code: String,

    /// Appointment date
    pub date: NaiveDate,

    /// Appointment time
    pub time: NaiveTime,

    /// Doctor full name
    pub doctor_name: String,

    /// Doctor department
    pub department: String,

    /// Doctor room number
    pub room_number: String,

    /// Patient full name
    pub patient_name: String,

    /// Service price, when already set
    pub service_price: Option<Decimal>,

    /// Clinic letterhead fields
    pub clinic: ClinicInfo,
}
