//! Authentication gate for the API gateway
//!
//! Verifies bearer JWTs on every inbound request without calling any
//! downstream service, then forwards the request with trust headers
//! (`X-User-Info`, `X-User-ID`, `X-Username`, `X-User-Roles`) describing
//! the verified identity. Rejected requests are answered with a JSON 401.

mod claims;
mod config;
mod error;
mod extractors;
mod gate;
mod headers;
mod identity;
mod jwt;
mod middleware;
mod responder;
mod validation;

#[cfg(test)]
mod test_support;

pub use claims::{ClaimSet, OneOrMany};
pub use config::{AuthConfig, ConfigError, SigningKey, MIN_SECRET_LEN};
pub use error::AuthError;
pub use extractors::GatewayIdentity;
pub use gate::{Gate, GateDecision};
pub use headers::{
    inject_identity, write_trust_headers, TRUST_HEADERS, X_USERNAME,
    X_USER_ID, X_USER_INFO, X_USER_ROLES,
};
pub use identity::{normalize, VerifiedIdentity, ANONYMOUS_USER_ID, DEFAULT_ROLE};
pub use jwt::{extract_bearer_token, parse_token, verify_signature, ParsedToken, TokenHeader, Verification};
pub use middleware::{gate_middleware, protect};
pub use responder::Rejection;
pub use validation::validate_claims;
