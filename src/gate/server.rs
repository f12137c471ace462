//! # Gate server
//!
//! Axum HTTP server hosting the gated router.

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::store::CredentialStore;
use crate::config::AppConfig;
use crate::error::{GateError, Result};
use crate::gate::middleware::GateState;
use crate::gate::routes::gate_router;

/// HTTP server wrapping the gate around a consumer router.
pub struct GateServer {
    /// Configuration
    config: AppConfig,
    /// Router with all gate layers applied
    router: Router,
}

impl GateServer {
    /// Create a new server.
    ///
    /// Fails when the signing secret is unusable — fatal at startup by
    /// design.
    pub fn new(config: AppConfig, store: Arc<dyn CredentialStore>, app: Router) -> Result<Self> {
        let state = GateState::new(Arc::new(config.auth.clone()), store)?;

        let router = gate_router(state, app).layer(TraceLayer::new_for_http()).layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

        Ok(Self { config, router })
    }

    /// The assembled router; useful for driving the gate in-process.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        );
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!(%addr, "session gate listening");

        axum::serve(listener, self.router)
            .await
            .map_err(|e| GateError::server_start_with_source("server terminated", e))
    }
}
