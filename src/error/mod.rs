//! The unified error handling system for the gateway.

pub use types::GateError;

/// A unified `Result` type for the entire crate.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, GateError>;

pub mod types;

/// Error category for monitoring and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors caused by the client (bad credentials, malformed tokens).
    /// Corresponds to 4xx HTTP status codes.
    Client,
    /// Errors caused by the server or its dependencies.
    /// Corresponds to 5xx HTTP status codes.
    Server,
}

impl GateError {
    /// Classify the error for alerting purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TokenInvalid { .. } | Self::TokenExpired | Self::PrincipalNotFound { .. } => {
                ErrorCategory::Client
            }
            Self::Config { .. }
            | Self::Signing { .. }
            | Self::Store { .. }
            | Self::ServerStart { .. }
            | Self::Internal { .. } => ErrorCategory::Server,
        }
    }
}
