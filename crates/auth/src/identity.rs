//! Identity normalization
//!
//! Maps the claim shapes issued by different identity-provider generations
//! onto one `VerifiedIdentity`. Never fails: a missing or oddly shaped claim
//! falls through to the next alias and finally to a fixed default.

use serde::{Deserialize, Serialize};

use crate::claims::{ClaimSet, OneOrMany};

/// userId used when no subject-like claim is present
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// Role granted when the token carries no usable `roles` claim
pub const DEFAULT_ROLE: &str = "user";

const USER_ID_CLAIMS: &[&str] = &["sub", "preferred_username", "user_id"];
const USERNAME_CLAIMS: &[&str] = &["username", "preferred_username", "name"];

/// Identity derived from a verified token, forwarded to downstream services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub issuer: Option<String>,
    /// Expiration in epoch milliseconds
    pub expires_at: Option<i64>,
}

impl VerifiedIdentity {
    /// Roles as a comma-separated list
    pub fn roles_header(&self) -> String {
        self.roles.join(",")
    }
}

/// Build the identity from a claim set.
pub fn normalize(claims: &ClaimSet) -> VerifiedIdentity {
    let user_id = first_present(claims, USER_ID_CLAIMS)
        .unwrap_or(ANONYMOUS_USER_ID)
        .to_string();

    let username = first_present(claims, USERNAME_CLAIMS)
        .map(str::to_string)
        .unwrap_or_else(|| user_id.clone());

    VerifiedIdentity {
        user_id,
        username,
        roles: normalize_roles(claims.get_one_or_many("roles")),
        issuer: claims.issuer().map(str::to_string),
        // Validation has already rejected a non-numeric exp
        expires_at: claims
            .expiration()
            .ok()
            .flatten()
            .map(|exp| exp.saturating_mul(1000)),
    }
}

// Values that cannot travel in a header count as absent.
fn first_present<'a>(claims: &'a ClaimSet, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| claims.get_str(name))
        .find(|value| header_safe(value))
}

fn header_safe(value: &str) -> bool {
    !value.chars().any(|c| c.is_control() && c != '\t')
}

fn normalize_roles(roles: Option<OneOrMany>) -> Vec<String> {
    match roles {
        Some(OneOrMany::One(role)) if !role.trim().is_empty() => vec![role],
        Some(OneOrMany::Many(roles)) => roles,
        _ => default_roles(),
    }
}

fn default_roles() -> Vec<String> {
    vec![DEFAULT_ROLE.to_string()]
}
