//! Gateway composition root
//!
//! Puts the authentication gate in front of the routing layer. Routing itself
//! (matching, rewriting, load balancing) is supplied by the caller as a
//! `Router`; everything in it is protected.

use std::time::Duration;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, HeaderName, Method, Uri},
    routing::get,
    Json, Router,
};
use gateway_auth::{
    protect, AuthConfig, Gate, GatewayIdentity, VerifiedIdentity, X_USERNAME, X_USER_ID,
    X_USER_ROLES,
};
use gateway_common::Config;
use serde_json::{json, Value};
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// Create the gateway router: health check plus the gated downstream router.
///
/// Fails when the authentication configuration is invalid, so a gateway with
/// a short or missing signing key never starts.
pub fn create_app(config: &Config, downstream: Router) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig::try_from(config)
        .map_err(|e| anyhow::anyhow!("Invalid authentication configuration: {}", e))?;

    info!(
        algorithm = ?auth_config.algorithm,
        key_len = auth_config.signing_key.len(),
        issuer = ?auth_config.issuer,
        audience = ?auth_config.audience,
        "Authentication gate configured"
    );
    if auth_config.legacy_unsigned_fallback {
        warn!("Legacy unsigned-token fallback is enabled; do not use in production");
    }

    let gate = Gate::new(auth_config);

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(protect(downstream, gate))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Local stand-in for the routing layer.
///
/// `/whoami` answers with the verified identity; every other path echoes the
/// request line and the trust headers it would have forwarded.
pub fn echo_downstream() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .fallback(echo)
}

async fn whoami(GatewayIdentity(identity): GatewayIdentity) -> Json<VerifiedIdentity> {
    Json(identity)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap) -> Json<Value> {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "user_id": header(X_USER_ID),
        "username": header(X_USERNAME),
        "roles": header(X_USER_ROLES),
        "authorization": headers.contains_key(AUTHORIZATION),
    }))
}
