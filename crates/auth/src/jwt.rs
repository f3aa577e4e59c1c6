//! JWT token extraction, structural parsing and signature verification

use axum::http::HeaderValue;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use serde_json::Value;

use crate::claims::ClaimSet;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Decoded JOSE header. Only `alg` matters to the gate; other members
/// (`typ`, `kid`, ...) are ignored whatever their type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
}

impl TokenHeader {
    /// Asymmetric algorithms that an HMAC key cannot verify.
    fn is_asymmetric(&self) -> bool {
        matches!(
            self.alg.as_str(),
            "RS256" | "RS384" | "RS512" | "PS256" | "PS384" | "PS512" | "ES256" | "ES384" | "ES512" | "EdDSA"
        )
    }
}

/// A structurally valid token, borrowed from the raw credential.
#[derive(Debug, Clone)]
pub struct ParsedToken<'a> {
    pub header: TokenHeader,
    pub claims: ClaimSet,
    header_segment: &'a str,
    payload_segment: &'a str,
    signature_segment: &'a str,
}

impl<'a> ParsedToken<'a> {
    /// `header.payload`, the bytes the signature covers.
    fn signing_input(&self) -> String {
        format!("{}.{}", self.header_segment, self.payload_segment)
    }

    pub fn signature(&self) -> &'a str {
        self.signature_segment
    }
}

/// How a token's claims came to be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// HMAC signature checked against the configured key.
    Signed,
    /// Foreign-algorithm token accepted unsigned (legacy fallback mode).
    LegacyUnsigned,
}

/// Extract the bearer credential from an Authorization header.
///
/// The `Bearer ` prefix is case-sensitive. A missing header, a non-ASCII
/// value, another scheme or an empty credential all yield `None`.
pub fn extract_bearer_token(header: Option<&HeaderValue>) -> Option<&str> {
    header
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Split a credential into its three segments and decode header and payload.
pub fn parse_token(token: &str) -> Result<ParsedToken<'_>, AuthError> {
    let mut segments = token.split('.');
    let (header_segment, payload_segment, signature_segment) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                (h, p, s)
            }
            _ => {
                tracing::debug!(
                    segments = token.split('.').count(),
                    "Token does not have three non-empty segments"
                );
                return Err(AuthError::MalformedToken);
            }
        };

    let header: TokenHeader = serde_json::from_slice(&decode_segment(header_segment)?)
        .map_err(|e| {
            tracing::debug!(error = %e, "Token header is not a JOSE header");
            AuthError::MalformedToken
        })?;

    let claims = match serde_json::from_slice::<Value>(&decode_segment(payload_segment)?) {
        Ok(Value::Object(map)) => ClaimSet::new(map),
        Ok(_) => {
            tracing::debug!("Token payload is not a JSON object");
            return Err(AuthError::MalformedToken);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token payload is not JSON");
            return Err(AuthError::MalformedToken);
        }
    };

    Ok(ParsedToken {
        header,
        claims,
        header_segment,
        payload_segment,
        signature_segment,
    })
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, AuthError> {
    URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        tracing::debug!(error = %e, "Token segment is not base64url");
        AuthError::MalformedToken
    })
}

/// Verify the token signature against the configured key.
///
/// The configured algorithm is authoritative: a header naming any other
/// algorithm fails, except that asymmetric tokens are let through unsigned
/// when `legacy_unsigned_fallback` is on. Expiration is still checked by the
/// claims validator on that path.
pub fn verify_signature(
    token: &ParsedToken<'_>,
    config: &AuthConfig,
) -> Result<Verification, AuthError> {
    if header_algorithm(&token.header) != Some(config.algorithm) {
        if config.legacy_unsigned_fallback && token.header.is_asymmetric() {
            tracing::warn!(
                alg = %token.header.alg,
                "Accepting token without signature verification (legacy fallback mode)"
            );
            return Ok(Verification::LegacyUnsigned);
        }

        tracing::debug!(
            alg = %token.header.alg,
            expected = ?config.algorithm,
            "Token algorithm does not match configured algorithm"
        );
        return Err(AuthError::SignatureInvalid);
    }

    // Constant-time comparison happens inside jsonwebtoken.
    let valid = jsonwebtoken::crypto::verify(
        token.signature(),
        token.signing_input().as_bytes(),
        config.signing_key.decoding_key(),
        config.algorithm,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Signature verification errored");
        AuthError::SignatureInvalid
    })?;

    if valid {
        Ok(Verification::Signed)
    } else {
        tracing::debug!("Token signature does not match");
        Err(AuthError::SignatureInvalid)
    }
}

fn header_algorithm(header: &TokenHeader) -> Option<Algorithm> {
    header.alg.parse().ok()
}
