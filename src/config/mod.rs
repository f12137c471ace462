//! # Configuration management
//!
//! Process-wide immutable configuration, built once at startup from
//! environment variables and passed explicitly to the components that need
//! it. There is no ambient global lookup.

pub mod app_config;

pub use app_config::{AppConfig, AuthConfig, ServerConfig};
