//! Authentication configuration
//!
//! Built once at startup. Every check that can fail on configuration alone
//! (key length, algorithm name, reject status) happens here so that a
//! misconfigured gate never starts.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, DecodingKey};

/// Minimum HMAC secret length in bytes (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Startup configuration error. Fatal: the gate cannot be constructed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    EmptySecret,

    #[error("JWT secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    SecretTooShort(usize),

    #[error("unsupported JWT algorithm '{0}', expected one of HS256, HS384, HS512")]
    UnsupportedAlgorithm(String),

    #[error("reject status must be a 4xx status code, got {0}")]
    InvalidRejectStatus(u16),
}

/// HMAC signing key, validated and immutable.
#[derive(Clone)]
pub struct SigningKey {
    key: DecodingKey,
    len: usize,
}

impl SigningKey {
    /// Build a key from a UTF-8 secret, enforcing the minimum length.
    pub fn from_secret(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let bytes = secret.as_bytes();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort(bytes.len()));
        }

        Ok(Self {
            key: DecodingKey::from_secret(bytes),
            len: bytes.len(),
        })
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for SigningKey {
    #[mutants::skip] // Redaction only, no behaviour to test
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub signing_key: SigningKey,
    pub algorithm: Algorithm,
    /// Expected issuer. Mismatches are logged, never rejected.
    pub issuer: Option<String>,
    /// Expected audience. Mismatches are rejected.
    pub audience: Option<String>,
    /// Accept claims from tokens signed with a non-HMAC algorithm without
    /// verifying the signature. Development only.
    pub legacy_unsigned_fallback: bool,
    pub reject_status: StatusCode,
    /// Keep the raw `Authorization` header on forwarded requests.
    pub forward_authorization: bool,
}

impl AuthConfig {
    /// HS256 configuration with no issuer/audience expectations.
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            signing_key: SigningKey::from_secret(secret)?,
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
            legacy_unsigned_fallback: false,
            reject_status: StatusCode::UNAUTHORIZED,
            forward_authorization: false,
        })
    }

    pub fn with_algorithm(mut self, name: &str) -> Result<Self, ConfigError> {
        self.algorithm = parse_hmac_algorithm(name)?;
        Ok(self)
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_legacy_unsigned_fallback(mut self, enabled: bool) -> Self {
        self.legacy_unsigned_fallback = enabled;
        self
    }

    pub fn with_reject_status(mut self, status: u16) -> Result<Self, ConfigError> {
        let status = StatusCode::from_u16(status)
            .ok()
            .filter(StatusCode::is_client_error)
            .ok_or(ConfigError::InvalidRejectStatus(status))?;
        self.reject_status = status;
        Ok(self)
    }

    pub fn with_forward_authorization(mut self, enabled: bool) -> Self {
        self.forward_authorization = enabled;
        self
    }
}

impl TryFrom<&gateway_common::Config> for AuthConfig {
    type Error = ConfigError;

    fn try_from(config: &gateway_common::Config) -> Result<Self, Self::Error> {
        let mut auth = AuthConfig::new(&config.jwt_secret)?
            .with_algorithm(&config.jwt_algorithm)?
            .with_reject_status(config.reject_status)?
            .with_legacy_unsigned_fallback(config.legacy_unsigned_fallback)
            .with_forward_authorization(config.forward_authorization);

        auth.issuer = config.jwt_issuer.clone();
        auth.audience = config.jwt_audience.clone();

        Ok(auth)
    }
}

fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(name.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
    }
}
