//! Claims validation: expiration, issuer, audience
//!
//! Issuer and audience are checked asymmetrically. An issuer mismatch is
//! only logged because issuer strings differ between environments; an
//! audience mismatch rejects.

use serde_json::Value;

use crate::claims::ClaimSet;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validate a verified claim set at `now_millis` (epoch milliseconds).
pub fn validate_claims(
    claims: &ClaimSet,
    config: &AuthConfig,
    now_millis: i64,
) -> Result<(), AuthError> {
    if let Some(exp) = claims.expiration()? {
        if exp.saturating_mul(1000) < now_millis {
            tracing::debug!(exp, now_millis, "Token expired");
            return Err(AuthError::Expired);
        }
    }

    if let (Some(expected), Some(actual)) = (config.issuer.as_deref(), claims.issuer()) {
        if !issuer_matches(expected, actual) {
            tracing::warn!(
                expected_issuer = %expected,
                actual_issuer = %actual,
                "JWT issuer mismatch, continuing"
            );
        }
    }

    if let Some(expected) = config.audience.as_deref() {
        match (claims.get("aud"), claims.audience()) {
            (None | Some(Value::Null), _) => {}
            (Some(_), Some(actual)) if actual.contains(expected) => {}
            (Some(raw), actual) => {
                let actual = actual.map_or_else(|| raw.to_string(), |a| a.joined());
                tracing::debug!(
                    expected_audience = %expected,
                    actual_audience = %actual,
                    "JWT audience mismatch"
                );
                return Err(AuthError::AudienceMismatch {
                    expected: expected.to_string(),
                    actual,
                });
            }
        }
    }

    Ok(())
}

/// Lenient issuer comparison. A realm URL that embeds the expected issuer
/// name counts as a match.
fn issuer_matches(expected: &str, actual: &str) -> bool {
    actual.contains(expected)
}
