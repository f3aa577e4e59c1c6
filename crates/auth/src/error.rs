//! Authentication errors
//!
//! Every variant is a per-request rejection. The `Display` text is the
//! human-readable reason written into the rejection body.

use axum::response::{IntoResponse, Response};

use crate::responder::Rejection;

/// Authentication error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("malformed token")]
    MalformedToken,

    #[error("signature verification failed")]
    SignatureInvalid,

    #[error("token expired")]
    Expired,

    #[error("audience mismatch: expected={expected}, actual={actual}")]
    AudienceMismatch { expected: String, actual: String },

    /// Catch-all for anything the pipeline did not anticipate.
    #[error("token verification failed")]
    VerificationFailed,
}

impl AuthError {
    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MISSING_CREDENTIAL",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::SignatureInvalid => "SIGNATURE_INVALID",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::AudienceMismatch { .. } => "AUDIENCE_MISMATCH",
            AuthError::VerificationFailed => "VERIFICATION_FAILED",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Rejection::unauthorized(self).into_response()
    }
}
