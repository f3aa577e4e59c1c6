//! Axum extractor for handlers running behind the gate
//!
//! The gate middleware stores the `VerifiedIdentity` as a request extension;
//! `GatewayIdentity` reads it back.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AuthError;
use crate::identity::VerifiedIdentity;

/// Identity verified by the gate.
///
/// Rejects with `MissingCredential` when the route is not behind the gate.
#[derive(Debug, Clone)]
pub struct GatewayIdentity(pub VerifiedIdentity);

impl<S> FromRequestParts<S> for GatewayIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .map(GatewayIdentity)
            .ok_or(AuthError::MissingCredential)
    }
}
