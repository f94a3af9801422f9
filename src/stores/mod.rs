// Stores layer - Data access and repository pattern
pub mod appointment_store;
pub mod credential_store;
pub mod doctor_store;
pub mod patient_store;
pub mod payment_store;
pub mod report_store;
pub mod setting_store;
pub mod user_store;

pub use appointment_store::AppointmentStore;
pub use credential_store::CredentialStore;
pub use doctor_store::DoctorStore;
pub use patient_store::PatientStore;
pub use payment_store::PaymentStore;
pub use report_store::ReportStore;
pub use setting_store::SettingStore;
pub use user_store::UserStore;
