//! Unauthorized responder
//!
//! Terminates a rejected request with a JSON body. Nothing downstream of the
//! gate ever sees a rejected request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AuthError;

/// A rejected request: the reason and the status to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub error: AuthError,
    pub status: StatusCode,
}

impl Rejection {
    pub fn new(error: AuthError, status: StatusCode) -> Self {
        Self { error, status }
    }

    pub fn unauthorized(error: AuthError) -> Self {
        Self::new(error, StatusCode::UNAUTHORIZED)
    }

    /// Build the response with an explicit timestamp (epoch millis).
    pub fn into_response_at(self, timestamp_millis: i64) -> Response {
        let body = Json(json!({
            "error": "Unauthorized",
            "message": self.error.to_string(),
            "timestamp": timestamp_millis,
        }));

        (self.status, body).into_response()
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.into_response_at(chrono::Utc::now().timestamp_millis())
    }
}
