//! Common test utilities and fixtures for integration tests
//!
//! - Gateway configuration fixtures
//! - Token minting (HMAC-signed and hand-built)
//! - Request helpers and response assertions

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, Response},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use gateway_common::Config;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

/// Signing secret shared by the test identity provider and the gateway
pub const TEST_SECRET: &str = "integration-test-secret-32-bytes";

/// Far-future expiration (year 2286)
pub const FAR_FUTURE_EXP: u64 = 9_999_999_999;

/// Gateway configuration as it would be read from the environment
pub fn test_config() -> Config {
    Config {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_algorithm: "HS256".to_string(),
        jwt_issuer: None,
        jwt_audience: None,
        legacy_unsigned_fallback: false,
        reject_status: 401,
        forward_authorization: false,
        request_timeout_secs: 30,
        rust_log: "gateway=debug".to_string(),
        port: 0,
    }
}

/// Test gateway in front of the echo downstream
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let router = gateway_app::create_app(&config, gateway_app::echo_downstream())
            .expect("test configuration must be valid");
        Self { router }
    }

    /// Send a GET request with an optional raw Authorization value
    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Send a GET request with `Bearer <token>`
    pub async fn get_with_token(&self, uri: &str, token: &str) -> Response<Body> {
        self.get(uri, Some(&format!("Bearer {token}"))).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// HS256 token as issued by the identity provider
pub fn mint_token(claims: &Value) -> String {
    mint_token_with(claims, TEST_SECRET, Algorithm::HS256)
}

pub fn mint_token_with(claims: &Value, secret: &str, algorithm: Algorithm) -> String {
    jsonwebtoken::encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode JWT")
}

/// Token with an arbitrary header `alg` and signature segment, never signed
pub fn forge_token(alg: &str, claims: &Value, signature: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(format!(r#"{{"alg":"{alg}","typ":"JWT"}}"#));
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.{signature}")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body must be JSON")
}

/// Assert a gate rejection and return its message
pub async fn assert_rejected(response: Response<Body>, status: u16) -> String {
    assert_eq!(response.status().as_u16(), status);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
    body["message"]
        .as_str()
        .expect("message must be a string")
        .to_string()
}
