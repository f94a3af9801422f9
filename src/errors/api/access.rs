use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{BillingError, CredentialError, InternalError, NumberingError};
use crate::types::dto::common::ErrorResponse;

/// Login entry point the guard redirects to
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Error responses for role-guarded endpoints.
///
/// The guard never answers a plain 403: an unauthenticated caller is sent to
/// the login entry point with the original path recorded, and a caller whose
/// role is not on the allow-list has their session revoked first (fail-closed)
/// and is then sent to login as well.
#[derive(ApiResponse, Debug)]
pub enum AccessError {
    /// Redirect to the login entry point
    #[oai(status = 303)]
    LoginRedirect(#[oai(header = "Location")] String),

    /// Request is invalid for the current record state
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Operation is not allowed on the target record
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Record not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Record already exists
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl AccessError {
    /// No valid session; send the caller to login, remembering where they were going
    pub fn not_authenticated(next: &str) -> Self {
        AccessError::LoginRedirect(format!("{}?next={}", LOGIN_PATH, next))
    }

    /// Role not on the allow-list; session has been revoked, back to login
    pub fn role_not_permitted() -> Self {
        AccessError::LoginRedirect(LOGIN_PATH.to_string())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AccessError::BadRequest(Json(ErrorResponse {
            error: "bad_request".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AccessError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: message.into(),
            status_code: 403,
        }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AccessError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AccessError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
        }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AccessError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }

    /// Get the redirect target or error message from the variant
    pub fn message(&self) -> String {
        match self {
            AccessError::LoginRedirect(location) => location.clone(),
            AccessError::BadRequest(json) => json.0.message.clone(),
            AccessError::Forbidden(json) => json.0.message.clone(),
            AccessError::NotFound(json) => json.0.message.clone(),
            AccessError::Conflict(json) => json.0.message.clone(),
            AccessError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AccessError {
    fn from(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::UserNotFound(name)) => {
                AccessError::not_found(format!("User not found: {}", name))
            }
            InternalError::Numbering(NumberingError::EntityUnavailable { entity }) => {
                AccessError::not_found(format!("Counter owner unavailable: {}", entity))
            }
            InternalError::Billing(BillingError::AlreadyPaid(id)) => {
                AccessError::conflict(format!("Payment already exists for appointment {}", id))
            }
            InternalError::Billing(BillingError::PriceNotSet(id)) => {
                AccessError::bad_request(format!(
                    "Service price has not been set for appointment {}",
                    id
                ))
            }
            _ => {
                tracing::error!("internal error: {err}");
                AccessError::internal(err.to_string())
            }
        }
    }
}
