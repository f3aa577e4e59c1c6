//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Values are only read and
//! shape-checked here; the auth crate validates the signing key itself.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HMAC signing secret shared with the identity provider
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// HMAC algorithm name (HS256, HS384, HS512)
    pub jwt_algorithm: String,
    /// Expected issuer; mismatches are only logged
    pub jwt_issuer: Option<String>,
    /// Expected audience; mismatches are rejected
    pub jwt_audience: Option<String>,
    /// Accept unsigned claims from non-HMAC identity providers (dev only)
    pub legacy_unsigned_fallback: bool,

    /// Gateway behaviour
    pub reject_status: u16,
    pub forward_authorization: bool,
    pub request_timeout_secs: u64,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // A missing .env is fine; a malformed one is an error
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(anyhow::Error::new(e).context("Failed to load .env").into());
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| Error::Configuration("JWT_SECRET is required".to_string()))?,
            jwt_algorithm: non_empty("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
            jwt_issuer: non_empty("JWT_ISSUER"),
            jwt_audience: non_empty("JWT_AUDIENCE"),
            legacy_unsigned_fallback: parse_flag(
                "JWT_LEGACY_UNSIGNED_FALLBACK",
                non_empty("JWT_LEGACY_UNSIGNED_FALLBACK"),
            )?,

            reject_status: parse_number("GATEWAY_REJECT_STATUS", non_empty("GATEWAY_REJECT_STATUS"))?
                .unwrap_or(401),
            forward_authorization: parse_flag(
                "GATEWAY_FORWARD_AUTHORIZATION",
                non_empty("GATEWAY_FORWARD_AUTHORIZATION"),
            )?,
            request_timeout_secs: parse_number(
                "GATEWAY_REQUEST_TIMEOUT_SECS",
                non_empty("GATEWAY_REQUEST_TIMEOUT_SECS"),
            )?
            .unwrap_or(30),

            rust_log: non_empty("RUST_LOG")
                .unwrap_or_else(|| "gateway=debug,tower_http=info".to_string()),
            port: parse_number("PORT", non_empty("PORT"))?.unwrap_or(3000),
        };

        Ok(config)
    }
}

fn parse_flag(key: &str, value: Option<String>) -> Result<bool> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Configuration(format!(
                "{key} must be a boolean, got '{v}'"
            ))),
        },
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| Error::Configuration(format!("{key} must be a number, got '{v}'")))
        })
        .transpose()
}
