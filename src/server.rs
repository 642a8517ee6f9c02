//! Server startup and graceful shutdown.

use crate::api::{self, AppState};
use crate::config::{ServiceConfig, effective_transform_slots};
use std::io;
use std::sync::Arc;

/// Create storage directories, bind, and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServiceConfig) -> io::Result<()> {
    let addr = config
        .server
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let state = Arc::new(AppState::from_config(config));
    state.lifecycle.ensure_directories()?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        uploads_dir = %config.storage.uploads_dir.display(),
        cropped_dir = %config.storage.cropped_dir.display(),
        max_upload_bytes = config.server.max_upload_bytes,
        quality = config.output.quality,
        transform_slots = effective_transform_slots(&config.processing),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Resolves on Ctrl+C (SIGINT) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
