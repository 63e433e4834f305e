//! Synthesis API endpoints.

use axum::{
    body::Body,
    extract::State,
    http::{header, Response, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use sesle_core::{SynthesisControls, SynthesisRequest, DEFAULT_VOICE};

/// Synthesis request body. Every field is defaulted so a missing
/// field reaches the handler instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct TtsRequest {
    /// Text to synthesize
    #[serde(default)]
    pub text: String,

    /// Voice identifier, e.g. `tr_TR-dfki-medium`
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Speaker ID for multi-speaker voices
    #[serde(default)]
    pub speaker_id: Option<i64>,

    /// Phoneme duration scale (higher is slower)
    #[serde(default)]
    pub length_scale: Option<f32>,

    /// Generation noise scale
    #[serde(default)]
    pub noise_scale: Option<f32>,

    /// Phoneme width noise scale
    #[serde(default)]
    pub noise_w: Option<f32>,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

/// Synthesize a complete WAV container for the request text.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Response<Body>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::bad_request("Text is required"));
    }

    info!(voice = %req.voice, chars = req.text.len(), "synthesis request");

    let _permit = state.acquire_permit().await;
    let timeout = Duration::from_secs(state.request_timeout_secs);

    let request = SynthesisRequest {
        text: req.text,
        voice: req.voice,
        controls: SynthesisControls {
            speaker_id: req.speaker_id,
            length_scale: req.length_scale,
            noise_scale: req.noise_scale,
            noise_w: req.noise_w,
        },
    };

    let wav = tokio::time::timeout(timeout, state.runtime.speak(request))
        .await
        .map_err(|_| ApiError::internal("Synthesis request timed out"))??;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, wav.len())
        .body(Body::from(wav))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {e}")))
}

/// Liveness probe for the synthesis front-end.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "piper-tts"
    }))
}
