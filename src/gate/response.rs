//! # Gate response bodies
//!
//! The wire shape every gate decision answers with: `{EC, DT, EM}`. `EC` is
//! 0 for success, -1 for auth rejections, -2 for service-side failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GateError;

/// Standard gate response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiBody {
    /// Error code: 0 success, -1 rejection, -2 service failure
    #[serde(rename = "EC")]
    pub ec: i32,
    /// Data payload
    #[serde(rename = "DT")]
    pub dt: Value,
    /// Human-readable message
    #[serde(rename = "EM")]
    pub em: String,
}

impl ApiBody {
    /// Build a body with an empty data payload.
    #[must_use]
    pub fn new(ec: i32, em: &str) -> Self {
        Self {
            ec,
            dt: Value::String(String::new()),
            em: em.to_string(),
        }
    }

    /// Build a body carrying data.
    #[must_use]
    pub fn with_data(ec: i32, dt: Value, em: &str) -> Self {
        Self {
            ec,
            dt,
            em: em.to_string(),
        }
    }
}

/// Build an arbitrary gate response.
pub fn reply(status: StatusCode, ec: i32, em: &str) -> Response {
    (status, Json(ApiBody::new(ec, em))).into_response()
}

/// 401: no usable credentials on the request.
pub fn not_authenticated() -> Response {
    reply(
        StatusCode::UNAUTHORIZED,
        -1,
        "Not authenticated the user",
    )
}

/// 405: rotation was attempted; the client must re-issue the original
/// request. Deliberately not a success code.
pub fn retry_with_new_token() -> Response {
    reply(
        StatusCode::METHOD_NOT_ALLOWED,
        -1,
        "Need to retry with new token!",
    )
}

/// 403: authenticated but the role set does not cover the path.
pub fn permission_denied() -> Response {
    reply(
        StatusCode::FORBIDDEN,
        -1,
        "you don't permission to access this resource...",
    )
}

/// 200: peer-service token verified.
pub fn service_verified() -> Response {
    reply(StatusCode::OK, 0, "verify the user")
}

/// 200 with a success message.
pub fn ok(em: &str) -> Response {
    reply(StatusCode::OK, 0, em)
}

/// Convert an internal error to its HTTP outcome.
///
/// Store and signing failures come out as 5xx; they are never disguised as
/// auth rejections.
pub fn app_error(error: &GateError) -> Response {
    let (status, code) = error.to_http_response_parts();
    tracing::error!(code, %error, "gate request failed");
    reply(status, -2, "Somthing wrongs in service...")
}
