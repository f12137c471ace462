//! # HTTP gate surface
//!
//! Everything that touches axum: response shapes, session cookies, the
//! authenticate/authorize middlewares, the peer-service verification
//! endpoint and the server wrapper.

pub mod cookies;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod service_token;

pub use cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use middleware::{AuthDecision, GateState, authenticate, authorize};
pub use routes::gate_router;
pub use server::GateServer;
