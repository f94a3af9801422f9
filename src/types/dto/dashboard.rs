use chrono::NaiveDate;
use poem_openapi::Object;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::db::payment::PaymentMethod;

/// Per-doctor appointment totals within the requested range
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DoctorActivityRow {
    /// Doctor ID (UUID)
    pub doctor_id: String,

    /// Doctor full name
    pub full_name: String,

    /// Department
    pub department: String,

    /// Appointments in range
    pub total: i64,
}

/// Front-desk dashboard summary
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Total number of doctors
    pub doctors_count: u64,

    /// Total number of patients
    pub patients_count: u64,

    /// Appointments within the requested range
    pub appointments_in_range: u64,

    /// Per-doctor totals within the range, busiest first
    pub per_doctor: Vec<DoctorActivityRow>,

    /// Range start (inclusive)
    pub start_date: NaiveDate,

    /// Range end (inclusive)
    pub end_date: NaiveDate,
}

/// One captured payment in the cashier report
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CashierReportRow {
    /// Capture time (Unix timestamp)
    pub paid_at: i64,

    /// Patient full name
    pub patient_name: String,

    /// Doctor full name
    pub doctor_name: String,

    /// Amount captured
    pub amount: Decimal,

    /// Payment method
    pub method: PaymentMethod,

    /// Cashier username
    pub cashier_username: String,

    /// Receipt number
    pub receipt_no: String,
}

/// Payments captured by cashiers within a date range, with grand total
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CashierReportResponse {
    /// Range start (inclusive)
    pub start_date: NaiveDate,

    /// Range end (inclusive)
    pub end_date: NaiveDate,

    /// Grand total over the rows
    pub total: Decimal,

    /// Captured payments, newest first
    pub rows: Vec<CashierReportRow>,
}
