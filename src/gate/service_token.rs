//! # Peer-service token verification
//!
//! Stateless trust probe for machine-to-machine calls: bearer header only,
//! no cookie path, no refresh.

use axum::{extract::State, http::HeaderMap, response::Response};

use crate::auth::types::VerifyOutcome;
use crate::gate::middleware::{GateState, extract_bearer_token};
use crate::gate::response;

/// Verify a peer service's bearer token.
///
/// Only a fully valid token is acknowledged; expired and malformed tokens
/// alike answer 401.
pub async fn verify_service_token(State(state): State<GateState>, headers: HeaderMap) -> Response {
    let Some(token) = extract_bearer_token(&headers) else {
        return response::not_authenticated();
    };

    match state.codec().verify(&token) {
        VerifyOutcome::Valid(claims) => {
            tracing::debug!(peer = %claims.sub, "service token verified");
            response::service_verified()
        }
        VerifyOutcome::Expired | VerifyOutcome::Invalid => response::not_authenticated(),
    }
}
