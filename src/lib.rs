//! # Session Token Gateway Library
//!
//! Issues and verifies signed session tokens, transparently rotates expired
//! sessions through a single-slot refresh token, and gates requests by
//! role/URL permissions. Designed to sit as middleware in front of an axum
//! application; user/role persistence stays with the consumer behind the
//! [`auth::CredentialStore`] contract.

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{GateError, Result};
