/// Axum server lifecycle
///
/// Binds the configured address and serves until the shared shutdown
/// notifier fires.
use crate::config::with_config;
use crate::logger::{self, LogTag};
use crate::webserver::{routes, state::AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;

/// Start the status API server
///
/// This function blocks until the server is shut down.
pub async fn start_server(state: Arc<AppState>, shutdown: Arc<Notify>) -> Result<(), String> {
    let (host, port) = with_config(|c| (c.webserver.host.clone(), c.webserver.port));

    let app = routes::create_router(state).layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid bind address {}:{}: {}", host, port, e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            format!(
                "Failed to bind to {}: address already in use\n\
                 Another smswatch instance is probably running.",
                addr
            )
        } else {
            format!("Failed to bind to {}: {}", addr, e)
        }
    })?;

    logger::info(
        LogTag::Webserver,
        &format!("Status API listening on http://{}", addr),
    );

    let shutdown_signal = async move {
        shutdown.notified().await;
        logger::info(LogTag::Webserver, "Status API shutting down");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
