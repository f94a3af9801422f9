use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Payment already exists for appointment {0}")]
    AlreadyPaid(String),

    #[error("Service price has not been set for appointment {0}")]
    PriceNotSet(String),
}
