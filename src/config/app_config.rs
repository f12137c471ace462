//! # Application configuration structures

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{GateError, Result};

/// Default allow-list: paths exempt from authentication and authorization.
const DEFAULT_NON_SECURE_PATHS: &[&str] = &["/login", "/register", "/logout", "/verify-service-jwt"];

/// Main application configuration.
///
/// Built once at startup and passed around behind an `Arc`; never mutated
/// after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Token and session configuration
    pub auth: AuthConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub jwt_expires_in: i64,
    /// Clock-skew tolerance for expiry checks, in seconds
    pub leeway: u64,
    /// `access_token` cookie max-age in seconds
    pub max_age_access_token: i64,
    /// `refresh_token` cookie max-age in seconds
    pub max_age_refresh_token: i64,
    /// Paths that bypass authentication and authorization entirely
    pub non_secure_paths: Vec<String>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub bind_address: String,
    /// Listen port
    pub port: u16,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production-jwt-secret-key".to_string(),
            jwt_expires_in: 3600,
            leeway: 0,
            max_age_access_token: 3600,
            max_age_refresh_token: 604_800,
            non_secure_paths: DEFAULT_NON_SECURE_PATHS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load the full configuration from environment variables.
    ///
    /// A missing `JWT_SECRET` is fatal: the process must not serve traffic
    /// without a signing secret.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            auth: AuthConfig::from_env()?,
            server: ServerConfig::from_env()?,
        })
    }
}

impl AuthConfig {
    /// Load authentication configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| GateError::config("JWT_SECRET is not set; refusing to start"))?;
        if jwt_secret.trim().is_empty() {
            return Err(GateError::config("JWT_SECRET is empty; refusing to start"));
        }

        let defaults = Self::default();
        let non_secure_paths = env::var("NON_SECURE_PATHS").map_or(defaults.non_secure_paths, |raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect()
        });

        Ok(Self {
            jwt_secret,
            jwt_expires_in: env_i64("JWT_EXPIRES_IN", defaults.jwt_expires_in)?,
            leeway: env_u64("JWT_LEEWAY", defaults.leeway)?,
            max_age_access_token: env_i64("MAX_AGE_ACCESS_TOKEN", defaults.max_age_access_token)?,
            max_age_refresh_token: env_i64(
                "MAX_AGE_REFRESH_TOKEN",
                defaults.max_age_refresh_token,
            )?,
            non_secure_paths,
        })
    }

    /// Whether `path` is on the non-secure allow-list.
    #[must_use]
    pub fn is_non_secure_path(&self, path: &str) -> bool {
        self.non_secure_paths.iter().any(|p| p == path)
    }
}

impl ServerConfig {
    /// Load server configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env_u16("PORT", defaults.port)?,
        })
    }
}

fn env_i64(key: &str, default: i64) -> Result<i64> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| GateError::config_with_source(format!("{key} is not a number: {raw}"), e)),
        Err(_) => Ok(default),
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| GateError::config_with_source(format!("{key} is not a number: {raw}"), e)),
        Err(_) => Ok(default),
    }
}

fn env_u16(key: &str, default: u16) -> Result<u16> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| GateError::config_with_source(format!("{key} is not a port: {raw}"), e)),
        Err(_) => Ok(default),
    }
}
