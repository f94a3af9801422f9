use poem_openapi::Enum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed role hierarchy governing permitted operations.
///
/// Every user carries exactly one role. Allow-lists on endpoints are
/// expressed as slices of this enum, never as free strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum Role {
    /// Clinic owner; manages users, doctors, and settings
    #[sea_orm(string_value = "creator")]
    Creator,

    /// Full administrator
    #[sea_orm(string_value = "admin")]
    Admin,

    /// Manager
    #[sea_orm(string_value = "admin1")]
    Admin1,

    /// Price setter
    #[sea_orm(string_value = "admin2")]
    Admin2,

    /// Cashier
    #[sea_orm(string_value = "admin3")]
    Admin3,

    /// Doctor
    #[sea_orm(string_value = "doctor")]
    Doctor,

    /// Reception desk; default for self-registration
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Admin => "admin",
            Role::Admin1 => "admin1",
            Role::Admin2 => "admin2",
            Role::Admin3 => "admin3",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_string_value() {
        for role in [
            Role::Creator,
            Role::Admin,
            Role::Admin1,
            Role::Admin2,
            Role::Admin3,
            Role::Doctor,
            Role::Staff,
        ] {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(role, back);
        }
    }

    #[test]
    fn test_role_as_str_matches_serde_representation() {
        let json = serde_json::to_string(&Role::Admin2).unwrap();
        assert_eq!(json, "\"admin2\"");
        assert_eq!(Role::Admin2.as_str(), "admin2");
    }
}
