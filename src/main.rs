//! Gracitecture backend binary.
//!
//! Important env variables:
//!   PORT                      : u16 (default 3000)
//!   ANTHROPIC_API_KEY         : enables image analysis if present
//!   ANTHROPIC_BASE_URL        : default "https://api.anthropic.com"
//!   ANTHROPIC_MODEL           : default "claude-sonnet-4-5"
//!   GRACITECTURE_CONFIG_PATH  : path to TOML config (prompts, analysis limits, catalog path)
//!   STATIC_DIR                : pre-built front end, default "./static"
//!   LOG_LEVEL                 : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT                : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use gracitecture::routes::build_router;
use gracitecture::state::AppState;
use gracitecture::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (catalog, model provider, prompts).
  let state = Arc::new(AppState::from_env());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "gracitecture", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "gracitecture", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "gracitecture", "Shutdown signal received");
}
