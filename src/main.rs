//! # Session gate main program
//!
//! Standalone gateway binary: environment configuration, in-memory
//! credential store, gate surface only (consumers embed their own routes
//! through the library API).

use axum::Router;
use std::sync::Arc;

use auth_gate::{
    AppConfig, Result,
    auth::MemoryCredentialStore,
    gate::GateServer,
    logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging(None);

    // Missing JWT_SECRET is fatal: never serve traffic without a signing key.
    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(%e, "configuration rejected");
    })?;

    let store = Arc::new(MemoryCredentialStore::new());
    let server = GateServer::new(config, store, Router::new())?;

    if let Err(e) = server.serve().await {
        tracing::error!(%e, "server exited with error");
        std::process::exit(1);
    }

    Ok(())
}
