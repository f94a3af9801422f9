// Database entities - SeaORM models
pub mod appointment;
pub mod clinic_setting;
pub mod doctor;
pub mod patient;
pub mod payment;
pub mod session;
pub mod user;
