//! JWT claims types
//!
//! Tokens come from several generations of identity provider, so the claim
//! set is kept as a raw JSON object and read through typed accessors rather
//! than deserialized into one fixed struct.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AuthError;

/// A claim that is either one string or a list of strings (`aud`, `roles`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            OneOrMany::One(v) => v == value,
            OneOrMany::Many(values) => values.iter().any(|v| v == value),
        }
    }

    pub fn joined(&self) -> String {
        match self {
            OneOrMany::One(v) => v.clone(),
            OneOrMany::Many(values) => values.join(","),
        }
    }
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String claim, treating blank strings and non-strings as absent.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Claim that may be a string or a list of strings.
    pub fn get_one_or_many(&self, name: &str) -> Option<OneOrMany> {
        self.0
            .get(name)
            .and_then(|v| OneOrMany::deserialize(v).ok())
    }

    /// `exp` in seconds since the epoch.
    ///
    /// Fractional values are truncated. Anything other than a number is a
    /// malformed token.
    pub fn expiration(&self) -> Result<Option<i64>, AuthError> {
        match self.0.get("exp") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or(AuthError::MalformedToken),
            Some(_) => Err(AuthError::MalformedToken),
        }
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    pub fn audience(&self) -> Option<OneOrMany> {
        self.get_one_or_many("aud")
    }
}
