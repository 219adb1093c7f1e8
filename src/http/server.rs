//! HTTP server lifecycle: bind, serve, drain, close the event sink.

use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::events::Publish;
use crate::http::routes::{router, AppState};

/// Serves the API on `address` until ctrl-c, then drains in-flight requests
/// and closes the event publisher.
pub async fn serve(
    address: &str,
    state: AppState,
    publisher: Arc<dyn Publish>,
) -> io::Result<()> {
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(address).await?;
    info!(address = %address, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = publisher.close().await {
        warn!(error = %e, "error closing event publisher");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
        return;
    }
    info!("shutdown requested");
}
