use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingError {
    #[error("Clinic settings row not found")]
    SingletonMissing,
}
