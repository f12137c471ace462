//! # Token lifecycle and access-control core
//!
//! Unified entry point for the session-token codec, the credential-store
//! contract, refresh rotation and role/URL permission matching. The HTTP
//! surface lives in [`crate::gate`]; everything here is framework-free
//! apart from the error mapping.

pub mod jwt;
pub mod permissions;
pub mod refresh;
pub mod store;
pub mod types;

pub use jwt::TokenCodec;
pub use refresh::RefreshCoordinator;
pub use store::{CredentialStore, MemoryCredentialStore};
pub use types::{AuthContext, Principal, RotateOutcome, TokenPair, VerifyOutcome};
