use thiserror::Error;

/// Failures of the credential store and the session gate.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("{0} is not available right now")]
    NotAvailable(&'static str),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Credential store error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures surfaced by the external service adapters.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Could not understand audio")]
    NoSpeechDetected,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        ServiceError::ServiceUnavailable(e.to_string())
    }
}

/// Failures of the local text tools.
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not read document: {0}")]
    Decode(String),
}

/// Microphone capture failures.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("No input device found")]
    NoInputDevice,

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Failed to encode WAV: {0}")]
    Encode(#[from] hound::Error),
}

/// Anything that can end a single user interaction.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Please enter some text first")]
    EmptyText,

    #[error("Could not write output file: {0}")]
    Output(#[from] std::io::Error),

    #[error("Could not start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_what_the_user_sees() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
        assert_eq!(AuthError::PasswordMismatch.to_string(), "Passwords don't match");
        assert_eq!(
            ServiceError::NoSpeechDetected.to_string(),
            "Could not understand audio"
        );
    }

    #[test]
    fn runtime_failure_is_not_reported_as_output() {
        let io = std::io::Error::other("no threads");
        assert_eq!(
            AppError::Runtime(io).to_string(),
            "Could not start the async runtime: no threads"
        );
        let io = std::io::Error::other("disk full");
        assert_eq!(
            AppError::from(io).to_string(),
            "Could not write output file: disk full"
        );
    }

    #[test]
    fn app_error_is_transparent_over_auth() {
        let err: AppError = AuthError::DuplicateUser("bob".into()).into();
        assert_eq!(err.to_string(), "Username already exists: bob");
    }
}
