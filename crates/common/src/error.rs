//! Common error types for the gateway

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the gateway
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Get the error code for logs and startup diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}
