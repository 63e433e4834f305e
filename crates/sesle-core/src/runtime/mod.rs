//! Runtime facade tying the session cache to the engine adapters.

mod asr;
mod service;
mod tts;

pub use service::SpeechRuntime;

use std::path::PathBuf;

use crate::config::ComputeProfile;

/// A transcription request after HTTP-level validation.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio_path: PathBuf,
    pub model: String,
    pub language: String,
    pub profile: ComputeProfile,
}
