//! The authentication gate: runs the full pipeline for one request
//!
//! Extract → parse → verify → validate → normalize. Header injection and the
//! rejection response are applied by the middleware on the decision made here.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::identity::{normalize, VerifiedIdentity};
use crate::jwt::{extract_bearer_token, parse_token, verify_signature, Verification};
use crate::responder::Rejection;
use crate::validation::validate_claims;

/// Terminal outcome of the pipeline for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Forward(VerifiedIdentity),
    Reject(Rejection),
}

impl GateDecision {
    pub fn is_forward(&self) -> bool {
        matches!(self, GateDecision::Forward(_))
    }

    pub fn identity(&self) -> Option<&VerifiedIdentity> {
        match self {
            GateDecision::Forward(identity) => Some(identity),
            GateDecision::Reject(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            GateDecision::Forward(_) => None,
            GateDecision::Reject(rejection) => Some(rejection),
        }
    }
}

/// Stateless gate over an immutable, shared configuration.
///
/// Cloning is cheap; every request-handling task reads the same key.
#[derive(Debug, Clone)]
pub struct Gate {
    config: Arc<AuthConfig>,
}

impl Gate {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Decide on a request given its headers.
    pub fn evaluate(&self, headers: &HeaderMap) -> GateDecision {
        self.evaluate_at(
            headers.get(AUTHORIZATION),
            chrono::Utc::now().timestamp_millis(),
        )
    }

    /// Decide on a request's `Authorization` header at `now_millis`.
    ///
    /// A panic anywhere in the pipeline becomes a `VerificationFailed`
    /// rejection instead of unwinding into the server.
    pub fn evaluate_at(&self, authorization: Option<&HeaderValue>, now_millis: i64) -> GateDecision {
        match contain(|| self.authenticate(authorization, now_millis)) {
            Ok(identity) => GateDecision::Forward(identity),
            Err(error) => {
                tracing::debug!(code = error.code(), reason = %error, "Request rejected");
                GateDecision::Reject(Rejection::new(error, self.config.reject_status))
            }
        }
    }

    /// Run the pipeline, short-circuiting on the first failure.
    pub fn authenticate(
        &self,
        authorization: Option<&HeaderValue>,
        now_millis: i64,
    ) -> Result<VerifiedIdentity, AuthError> {
        let token = extract_bearer_token(authorization).ok_or(AuthError::MissingCredential)?;
        let parsed = parse_token(token)?;
        let verification = verify_signature(&parsed, &self.config)?;
        validate_claims(&parsed.claims, &self.config, now_millis)?;

        let identity = normalize(&parsed.claims);
        if verification == Verification::LegacyUnsigned {
            tracing::warn!(user_id = %identity.user_id, "Forwarding identity from unsigned legacy token");
        }

        Ok(identity)
    }
}

// A panic anywhere in the pipeline is a verification failure.
fn contain<F>(pipeline: F) -> Result<VerifiedIdentity, AuthError>
where
    F: FnOnce() -> Result<VerifiedIdentity, AuthError>,
{
    catch_unwind(AssertUnwindSafe(pipeline)).unwrap_or_else(|_| {
        tracing::error!("Authentication pipeline panicked");
        Err(AuthError::VerificationFailed)
    })
}
