//! Downstream trust headers
//!
//! Downstream services trust these headers blindly, so any client-supplied
//! copy is overwritten before forwarding.

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, Request};

use crate::error::AuthError;
use crate::identity::VerifiedIdentity;

pub const X_USER_INFO: HeaderName = HeaderName::from_static("x-user-info");
pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_USERNAME: HeaderName = HeaderName::from_static("x-username");
pub const X_USER_ROLES: HeaderName = HeaderName::from_static("x-user-roles");

/// All headers the gate owns on forwarded requests
pub const TRUST_HEADERS: [HeaderName; 4] = [X_USER_INFO, X_USER_ID, X_USERNAME, X_USER_ROLES];

/// Attach the identity to an outbound request.
///
/// The identity is also stored as a request extension for handlers running
/// in-process behind the gate.
pub fn inject_identity<B>(
    request: Request<B>,
    identity: &VerifiedIdentity,
    forward_authorization: bool,
) -> Result<Request<B>, AuthError> {
    let (mut parts, body) = request.into_parts();

    write_trust_headers(&mut parts.headers, identity)?;
    if !forward_authorization {
        parts.headers.remove(AUTHORIZATION);
    }
    parts.extensions.insert(identity.clone());

    Ok(Request::from_parts(parts, body))
}

/// Overwrite the trust headers with values from `identity`.
pub fn write_trust_headers(
    headers: &mut HeaderMap,
    identity: &VerifiedIdentity,
) -> Result<(), AuthError> {
    let user_info = serde_json::to_string(identity).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode identity");
        AuthError::VerificationFailed
    })?;

    let values = [
        header_value(&user_info)?,
        header_value(&identity.user_id)?,
        header_value(&identity.username)?,
        header_value(&identity.roles_header())?,
    ];

    for (name, value) in TRUST_HEADERS.into_iter().zip(values) {
        headers.insert(name, value);
    }

    Ok(())
}

// Claim values may carry UTF-8; only control characters are unrepresentable.
fn header_value(value: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_bytes(value.as_bytes()).map_err(|_| {
        tracing::debug!("Identity value cannot be carried in a header");
        AuthError::VerificationFailed
    })
}
