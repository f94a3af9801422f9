// API layer - HTTP endpoints
pub mod appointments;
pub mod auth;
pub mod dashboard;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod payments;
pub mod settings;
pub mod users;

pub use appointments::AppointmentsApi;
pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use doctors::DoctorsApi;
pub use health::HealthApi;
pub use patients::PatientsApi;
pub use payments::PaymentsApi;
pub use settings::SettingsApi;
pub use users::UsersApi;
