use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppSettings;
use crate::services::{RoleGuard, TokenService};
use crate::stores::{
    AppointmentStore, CredentialStore, DoctorStore, PatientStore, PaymentStore, ReportStore,
    SettingStore, UserStore,
};

/// Centralized application data following the main-owned stores pattern.
///
/// All stores and services are created once in main.rs and shared across the
/// API structs through `Arc` clones of these fields.
pub struct AppData {
    pub db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub user_store: Arc<UserStore>,
    pub doctor_store: Arc<DoctorStore>,
    pub patient_store: Arc<PatientStore>,
    pub appointment_store: Arc<AppointmentStore>,
    pub payment_store: Arc<PaymentStore>,
    pub setting_store: Arc<SettingStore>,
    pub report_store: Arc<ReportStore>,
    pub token_service: Arc<TokenService>,
    pub role_guard: Arc<RoleGuard>,
}

impl AppData {
    /// Build all stores and services on one database connection.
    ///
    /// The connection must already be migrated.
    pub fn init(db: DatabaseConnection, settings: &AppSettings) -> Self {
        tracing::debug!("Creating stores...");

        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            settings.password_pepper.clone(),
        ));
        let user_store = Arc::new(UserStore::new(db.clone()));
        let doctor_store = Arc::new(DoctorStore::new(db.clone()));
        let patient_store = Arc::new(PatientStore::new(db.clone()));
        let appointment_store = Arc::new(AppointmentStore::new(db.clone(), patient_store.clone()));
        let setting_store = Arc::new(SettingStore::new(db.clone()));
        let payment_store = Arc::new(PaymentStore::new(db.clone(), setting_store.clone()));
        let report_store = Arc::new(ReportStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(settings.jwt_secret.clone()));
        let role_guard = Arc::new(RoleGuard::new(db.clone(), token_service.clone()));

        tracing::debug!("Stores created");

        Self {
            db,
            credential_store,
            user_store,
            doctor_store,
            patient_store,
            appointment_store,
            payment_store,
            setting_store,
            report_store,
            token_service,
            role_guard,
        }
    }
}
