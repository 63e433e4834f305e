//! Sesle Core - Local Speech Inference Engine
//!
//! This crate wraps two local speech engines behind one runtime facade:
//! Piper for text-to-speech and Whisper for speech recognition. Each
//! engine holds at most one loaded model at a time; a request naming a
//! different model replaces the cached session lazily.
//!
//! # Example
//!
//! ```ignore
//! use sesle_core::{EngineConfig, SpeechRuntime, SynthesisRequest};
//!
//! let runtime = SpeechRuntime::new(EngineConfig::default());
//!
//! let wav = runtime.speak(SynthesisRequest {
//!     text: "Merhaba dünya".to_string(),
//!     voice: "tr_TR-dfki-medium".to_string(),
//!     controls: Default::default(),
//! }).await?;
//! ```

pub mod audio;
pub mod backends;
pub mod catalog;
pub mod config;
pub mod error;
pub mod runtime;
pub mod session;
pub mod synthesis;
pub mod transcript;

pub use config::{ComputeProfile, EngineConfig};
pub use error::{Error, Result};

// Runtime-facing re-exports
pub use runtime::{SpeechRuntime, TranscriptionRequest};
pub use synthesis::{SynthesisControls, SynthesisRequest};
pub use transcript::{Segment, TranscriptionResult, Word};

// Catalog re-exports
pub use catalog::{
    DEFAULT_LANGUAGE, DEFAULT_RECOGNIZER_MODEL, DEFAULT_VOICE, RECOGNIZER_MODELS,
};
