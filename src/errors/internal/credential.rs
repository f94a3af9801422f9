use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Password verification failed for user {0}")]
    PasswordMismatch(String),

    #[error("Account is disabled: {0}")]
    AccountDisabled(String),

    #[error("Stored password hash could not be parsed for user {0}")]
    HashInvalid(String),
}
