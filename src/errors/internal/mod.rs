use thiserror::Error;

pub mod billing;
pub mod credential;
pub mod numbering;
pub mod setting;

pub use billing::BillingError;
pub use credential::CredentialError;
pub use numbering::NumberingError;
pub use setting::SettingError;

/// Infrastructure-level database failures, tagged with the operation that hit them.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}

/// Internal error type for store and service operations.
///
/// Infrastructure errors are shared; domain errors live in their own enums.
/// Not exposed via the API - endpoints convert to an `ApiResponse` error.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Numbering(#[from] NumberingError),

    #[error(transparent)]
    Setting(#[from] SettingError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
