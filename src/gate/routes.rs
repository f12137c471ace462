//! # Gate route assembly
//!
//! Mounts the gate's own endpoints, merges the consumer's router and wraps
//! everything in the authenticate/authorize layers.

use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;

use crate::gate::cookies::clear_session_cookies;
use crate::gate::middleware::{GateState, authenticate, authorize};
use crate::gate::response;
use crate::gate::service_token::verify_service_token;

/// Assemble the gated router.
///
/// `app` carries the consumer's routes; every route (gate-owned, consumer
/// and the 404 fallback) sits behind the authenticate → authorize chain,
/// with the allow-list evaluated inside the layers themselves.
pub fn gate_router(state: GateState, app: Router) -> Router {
    let gate_routes = Router::new()
        .route(
            "/verify-service-jwt",
            get(verify_service_token).post(verify_service_token),
        )
        .route("/logout", get(logout).post(logout))
        .with_state(state.clone());

    Router::new()
        .merge(gate_routes)
        .merge(app)
        .fallback(not_found)
        // Layer order: the last layer added runs first, so authenticate
        // sees the request before authorize.
        .layer(from_fn_with_state(state.clone(), authorize))
        .layer(from_fn_with_state(state, authenticate))
}

/// Clear both session cookies.
async fn logout(jar: CookieJar) -> Response {
    let (access, refresh) = clear_session_cookies();
    (jar.add(access).add(refresh), response::ok("ok!")).into_response()
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 not found").into_response()
}
