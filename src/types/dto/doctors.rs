use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::doctor;

/// Request model for creating a doctor
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    /// Doctor full name
    pub full_name: String,

    /// Department
    pub department: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Room number
    pub room_number: Option<String>,

    /// Receipt code prefix; assigned automatically when omitted
    pub code_prefix: Option<String>,
}

/// Request model for updating a doctor
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    /// Doctor full name
    pub full_name: Option<String>,

    /// Department
    pub department: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Room number
    pub room_number: Option<String>,

    /// Receipt code prefix (1-2 uppercase characters)
    pub code_prefix: Option<String>,
}

/// Doctor record
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DoctorResponse {
    /// Doctor ID (UUID)
    pub id: String,

    /// Doctor full name
    pub full_name: String,

    /// Department
    pub department: String,

    /// Contact phone number
    pub phone: String,

    /// Room number
    pub room_number: String,

    /// Receipt code prefix
    pub code_prefix: String,

    /// Current value of the document counter
    pub receipt_serial: i64,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl From<doctor::Model> for DoctorResponse {
    fn from(d: doctor::Model) -> Self {
        Self {
            id: d.id,
            full_name: d.full_name,
            department: d.department,
            phone: d.phone,
            room_number: d.room_number,
            code_prefix: d.code_prefix,
            receipt_serial: d.receipt_serial,
            created_at: d.created_at,
        }
    }
}

/// Doctor list row with appointment activity counts
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DoctorListItem {
    /// Doctor record
    pub doctor: DoctorResponse,

    /// Total number of appointments
    pub appointments_total: i64,

    /// Number of appointments today
    pub appointments_today: i64,
}
