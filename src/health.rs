// ABOUTME: Optional HTTP liveness endpoint for hosting-platform health checks.
// ABOUTME: One fixed 200 plaintext route; it never touches dialogue state.

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tracing::info;

async fn liveness() -> &'static str {
    "OK"
}

/// The liveness router: a single fixed route.
pub fn router() -> Router {
    Router::new().route("/", get(liveness))
}

/// Bind and serve the liveness endpoint until the process exits.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("liveness endpoint listening on {addr}");
    axum::serve(listener, router()).await?;
    Ok(())
}
