//! HTTP front-ends for the sesle speech runtime.
//!
//! Two binaries share this crate: `sesle-tts` exposes `/tts`, and
//! `sesle-asr` exposes `/transcribe` plus `/models`. Both carry a
//! `/health` probe and share [`AppState`](state::AppState).

pub mod api;
pub mod error;
pub mod state;

use tokio::signal;
use tracing::info;

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
