//! Recognition API endpoints.

use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use sesle_core::{
    ComputeProfile, TranscriptionRequest, DEFAULT_LANGUAGE, DEFAULT_RECOGNIZER_MODEL,
    RECOGNIZER_MODELS,
};

/// Transcription request body. Every field is defaulted so a missing
/// field reaches the handler instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    /// Path to an audio file on the server's filesystem
    #[serde(default)]
    pub audio_path: String,

    /// Model size, e.g. `large-v3`
    #[serde(default = "default_model")]
    pub model: String,

    /// Transcription language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Quantization hint used at model load time
    #[serde(default = "default_compute_type")]
    pub compute_type: String,

    /// Inference device used at model load time
    #[serde(default = "default_device")]
    pub device: String,

    /// Worker count used at model load time
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
}

fn default_model() -> String {
    DEFAULT_RECOGNIZER_MODEL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_compute_type() -> String {
    "int8".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_num_workers() -> usize {
    1
}

/// Transcribe a server-local audio file into a word-timed transcript.
///
/// The body is serialized pretty-printed; serde_json writes UTF-8
/// directly, so non-ASCII transcript text is never escaped.
pub async fn transcribe(
    State(state): State<AppState>,
    Json(req): Json<TranscribeRequest>,
) -> Result<Response<Body>, ApiError> {
    if req.audio_path.trim().is_empty() {
        return Err(ApiError::bad_request("audio_path is required"));
    }

    info!(model = %req.model, path = %req.audio_path, "transcription request");

    let _permit = state.acquire_permit().await;
    let timeout = Duration::from_secs(state.request_timeout_secs);

    let request = TranscriptionRequest {
        audio_path: PathBuf::from(req.audio_path),
        model: req.model,
        language: req.language,
        profile: ComputeProfile {
            device: req.device,
            precision: req.compute_type,
            worker_count: req.num_workers,
        },
    };

    let result = tokio::time::timeout(timeout, state.runtime.transcribe(request))
        .await
        .map_err(|_| ApiError::internal("Transcription request timed out"))??;

    let body = serde_json::to_string_pretty(&result)
        .map_err(|e| ApiError::internal(format!("Failed to serialize transcript: {e}")))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
}

/// Liveness probe reporting the currently cached model, if any.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let model = state
        .runtime
        .loaded_model()
        .await
        .unwrap_or_else(|| "not_loaded".to_string());

    Json(json!({
        "status": "ok",
        "service": "whisper-asr",
        "model": model
    }))
}

/// Enumerate the supported model sizes.
pub async fn list_models() -> Json<serde_json::Value> {
    Json(json!({ "available_models": RECOGNIZER_MODELS }))
}
