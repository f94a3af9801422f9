use chrono::NaiveDate;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::patient;

/// Request model for registering a patient
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    /// Patient full name
    pub full_name: String,

    /// Contact phone number
    pub phone: Option<String>,

    /// Home address
    pub address: Option<String>,

    /// Date of birth
    pub birth_date: Option<NaiveDate>,
}

/// Patient record
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PatientResponse {
    /// Patient ID (UUID)
    pub id: String,

    /// Patient full name
    pub full_name: String,

    /// Contact phone number
    pub phone: String,

    /// Home address
    pub address: String,

    /// Date of birth
    pub birth_date: Option<NaiveDate>,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl From<patient::Model> for PatientResponse {
    fn from(p: patient::Model) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            phone: p.phone,
            address: p.address,
            birth_date: p.birth_date,
            created_at: p.created_at,
        }
    }
}
