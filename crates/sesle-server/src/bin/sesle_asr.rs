//! Sesle ASR Server - HTTP API for Whisper transcription

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sesle_core::{EngineConfig, SpeechRuntime};
use sesle_server::state::AppState;
use sesle_server::{api, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sesle_server=debug,sesle_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sesle ASR Server");

    let config = EngineConfig::default();
    info!("Models directory: {:?}", config.models_dir);

    let state = AppState::new(SpeechRuntime::new(config));
    let app = api::asr_router(state);

    let host = std::env::var("SESLE_ASR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("SESLE_ASR_PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid SESLE_ASR_PORT='{}', falling back to 5002", raw);
                5002
            }
        },
        Err(_) => 5002,
    };
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
