//! Axum middleware that puts the gate in front of a router

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::gate::{Gate, GateDecision};
use crate::headers::inject_identity;
use crate::responder::Rejection;

/// Protect every route currently in `router` with the gate.
///
/// Routes merged in after this call are not protected.
pub fn protect<S>(router: Router<S>, gate: Gate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, gate_middleware))
}

/// Authenticate the request, then either forward it with trust headers
/// or answer with the rejection.
pub async fn gate_middleware(State(gate): State<Gate>, request: Request, next: Next) -> Response {
    let identity = match gate.evaluate(request.headers()) {
        GateDecision::Forward(identity) => identity,
        GateDecision::Reject(rejection) => return rejection.into_response(),
    };

    match inject_identity(request, &identity, gate.config().forward_authorization) {
        Ok(request) => {
            tracing::debug!(user_id = %identity.user_id, "Request authenticated");
            next.run(request).await
        }
        Err(error) => Rejection::new(error, gate.config().reject_status).into_response(),
    }
}
