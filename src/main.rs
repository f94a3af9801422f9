use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;

use clinicdesk_backend::api::{
    AppointmentsApi, AuthApi, DashboardApi, DoctorsApi, HealthApi, PatientsApi, PaymentsApi,
    SettingsApi, UsersApi,
};
use clinicdesk_backend::config::{init_logging, AppSettings};
use clinicdesk_backend::services::crypto::generate_secure_password;
use clinicdesk_backend::types::internal::role::Role;
use clinicdesk_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = AppSettings::from_env().expect("Failed to load settings");

    let db = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("database migrations completed");

    let app_data = AppData::init(db, &settings);

    seed_first_creator(&app_data).await;

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(
                app_data.credential_store.clone(),
                app_data.user_store.clone(),
                app_data.token_service.clone(),
            ),
            PatientsApi::new(app_data.role_guard.clone(), app_data.patient_store.clone()),
            DoctorsApi::new(
                app_data.role_guard.clone(),
                app_data.doctor_store.clone(),
                app_data.appointment_store.clone(),
                app_data.payment_store.clone(),
                app_data.report_store.clone(),
            ),
            AppointmentsApi::new(
                app_data.role_guard.clone(),
                app_data.appointment_store.clone(),
                app_data.doctor_store.clone(),
                app_data.payment_store.clone(),
                app_data.setting_store.clone(),
            ),
            PaymentsApi::new(
                app_data.role_guard.clone(),
                app_data.payment_store.clone(),
                app_data.appointment_store.clone(),
                app_data.setting_store.clone(),
            ),
            DashboardApi::new(app_data.role_guard.clone(), app_data.report_store.clone()),
            SettingsApi::new(app_data.role_guard.clone(), app_data.setting_store.clone()),
            UsersApi::new(
                app_data.role_guard.clone(),
                app_data.user_store.clone(),
                app_data.credential_store.clone(),
                app_data.doctor_store.clone(),
            ),
        ),
        "Clinicdesk API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", settings.bind_address));

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(bind_address = %settings.bind_address, "starting server");
    tracing::info!("Swagger UI available at /swagger");

    Server::new(TcpListener::bind(settings.bind_address))
        .run(app)
        .await
}

/// Seed a Creator account on an empty database.
///
/// The generated password is logged exactly once; the operator is expected
/// to change it after first login.
async fn seed_first_creator(app_data: &AppData) {
    match app_data.user_store.count().await {
        Ok(0) => {
            let password = generate_secure_password();
            match app_data
                .credential_store
                .create_user(
                    "creator".to_string(),
                    password.clone(),
                    "Clinic Creator".to_string(),
                    Role::Creator,
                    true,
                )
                .await
            {
                Ok(user) => {
                    tracing::warn!(
                        username = %user.username,
                        password = %password,
                        "seeded first creator account; change this password after first login"
                    );
                }
                Err(e) => tracing::error!("failed to seed creator account: {e}"),
            }
        }
        Ok(_) => {}
        Err(e) => tracing::error!("failed to count users: {e}"),
    }
}
