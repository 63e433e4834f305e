//! API routes and handlers

pub mod asr;
pub mod tts;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Router for the synthesis front-end.
pub fn tts_router(state: AppState) -> Router {
    Router::new()
        .route("/tts", post(tts::synthesize))
        .route("/health", get(tts::health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Router for the recognition front-end.
pub fn asr_router(state: AppState) -> Router {
    Router::new()
        .route("/transcribe", post(asr::transcribe))
        .route("/health", get(asr::health))
        .route("/models", get(asr::list_models))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
