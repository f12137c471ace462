//! # Error type definitions

use axum::http::StatusCode;
use thiserror::Error;

/// Primary error type for the gateway.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration errors (missing or malformed startup configuration)
    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Token signing failed (unusable secret, serialization failure)
    #[error("signing error: {message}")]
    Signing {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Malformed token or bad signature; always terminal
    #[error("invalid token: {message}")]
    TokenInvalid { message: String },

    /// Token past its expiry; recoverable via refresh rotation
    #[error("token expired")]
    TokenExpired,

    /// Refresh token matched no stored principal
    #[error("principal not found: {message}")]
    PrincipalNotFound { message: String },

    /// Credential store I/O failure
    #[error("store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Server startup errors
    #[error("server start error: {message}")]
    ServerStart {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Internal errors
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl GateError {
    /// Map the error to an HTTP status code and a stable error code.
    ///
    /// Store failures are server-side (5xx), never reported as "not found".
    #[must_use]
    pub fn to_http_response_parts(&self) -> (StatusCode, &str) {
        match self {
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Signing { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "SIGNING_ERROR"),
            Self::TokenInvalid { .. } => (StatusCode::UNAUTHORIZED, "TOKEN_INVALID"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            Self::PrincipalNotFound { .. } => (StatusCode::UNAUTHORIZED, "PRINCIPAL_NOT_FOUND"),
            Self::Store { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            Self::ServerStart { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_START_ERROR"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Create a configuration error
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with a source
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a signing error
    pub fn signing<T: Into<String>>(message: T) -> Self {
        Self::Signing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a signing error with a source
    pub fn signing_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Signing {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an invalid-token error
    pub fn token_invalid<T: Into<String>>(message: T) -> Self {
        Self::TokenInvalid {
            message: message.into(),
        }
    }

    /// Create a principal-not-found error
    pub fn principal_not_found<T: Into<String>>(message: T) -> Self {
        Self::PrincipalNotFound {
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store<T: Into<String>>(message: T) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error with a source
    pub fn store_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a server startup error
    pub fn server_start<T: Into<String>>(message: T) -> Self {
        Self::ServerStart {
            message: message.into(),
            source: None,
        }
    }

    /// Create a server startup error with a source
    pub fn server_start_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::ServerStart {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an internal error
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with a source
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        Self::ServerStart {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}
