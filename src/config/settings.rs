use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),
}

/// Application settings loaded from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Address the HTTP server binds to
    pub bind_address: String,

    /// SeaORM connection string
    pub database_url: String,

    /// HS256 signing secret for session tokens
    pub jwt_secret: String,

    /// Server-side secret mixed into password hashes
    pub password_pepper: String,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let bind_address =
            env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://clinic.db?mode=rwc".to_string());

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| SettingsError::MissingVariable("JWT_SECRET"))?;

        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| SettingsError::MissingVariable("PASSWORD_PEPPER"))?;

        Ok(Self {
            bind_address,
            database_url,
            jwt_secret,
            password_pepper,
        })
    }
}
