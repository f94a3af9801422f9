use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::clinic_setting;

/// Clinic letterhead fields included on printable receipts
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ClinicInfo {
    /// Clinic name
    pub clinic_name: String,

    /// Clinic address
    pub clinic_address: String,

    /// Clinic phone number
    pub clinic_phone: String,

    /// Footer line printed on receipts
    pub receipt_footer: String,
}

impl From<&clinic_setting::Model> for ClinicInfo {
    fn from(s: &clinic_setting::Model) -> Self {
        Self {
            clinic_name: s.clinic_name.clone(),
            clinic_address: s.clinic_address.clone(),
            clinic_phone: s.clinic_phone.clone(),
            receipt_footer: s.receipt_footer.clone(),
        }
    }
}

/// Full clinic settings record
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    /// Clinic name
    pub clinic_name: String,

    /// Clinic address
    pub clinic_address: String,

    /// Clinic phone number
    pub clinic_phone: String,

    /// Footer line printed on receipts
    pub receipt_footer: String,

    /// Prefix for clinic-wide receipt numbers
    pub code_prefix: String,

    /// Current value of the clinic-wide receipt counter
    pub receipt_serial: i64,

    /// Last modification time (Unix timestamp)
    pub updated_at: i64,
}

impl From<clinic_setting::Model> for SettingsResponse {
    fn from(s: clinic_setting::Model) -> Self {
        Self {
            clinic_name: s.clinic_name,
            clinic_address: s.clinic_address,
            clinic_phone: s.clinic_phone,
            receipt_footer: s.receipt_footer,
            code_prefix: s.code_prefix,
            receipt_serial: s.receipt_serial,
            updated_at: s.updated_at,
        }
    }
}

/// Request model for updating clinic settings
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Clinic name
    pub clinic_name: Option<String>,

    /// Clinic address
    pub clinic_address: Option<String>,

    /// Clinic phone number
    pub clinic_phone: Option<String>,

    /// Footer line printed on receipts
    pub receipt_footer: Option<String>,
}
