//! Synthesis request types and the voice session capability surface.
//!
//! The synthesis library's invocation interface has shifted across
//! versions: a modern chunk-streaming form and a legacy sink-writer
//! form. Sessions expose both as capabilities that may individually
//! report "unsupported"; the negotiator tries them in a fixed order.

mod negotiator;

pub use negotiator::{synthesize, SynthesizedAudio};

use std::path::Path;

use crate::error::{Error, Result};

/// A synthesis request after HTTP-level validation.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Non-empty text to speak.
    pub text: String,
    /// Voice identifier, e.g. `tr_TR-dfki-medium`.
    pub voice: String,
    pub controls: SynthesisControls,
}

/// Optional naturalness controls; `None` means engine default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisControls {
    pub speaker_id: Option<i64>,
    pub length_scale: Option<f32>,
    pub noise_scale: Option<f32>,
    pub noise_w: Option<f32>,
}

impl SynthesisControls {
    /// True when every control is left to the engine default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// One unit of streamed synthesis output.
///
/// `pcm16` is `None` when the producing library version does not expose
/// a raw PCM accessor on its chunk type; the negotiator treats that as
/// a capability mismatch, not a hard failure.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub pcm16: Option<Vec<u8>>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// A finite, consumed-once sequence of audio chunks.
pub type ChunkStream<'a> = Box<dyn Iterator<Item = Result<AudioChunk>> + 'a>;

/// Outcome signal for a single invocation strategy.
#[derive(Debug)]
pub enum StrategyError {
    /// The session cannot service this invocation shape; the caller
    /// should try the next strategy.
    Unsupported(String),
    /// The engine failed outright; no further strategy is attempted.
    Failed(Error),
}

/// An initialized, ready-to-use synthesis session.
///
/// Object-safe so the runtime can hold `Arc<dyn VoiceSession>` and
/// tests can substitute doubles. A session is not required to be safe
/// for concurrent synthesis calls; callers serialize access.
pub trait VoiceSession: Send + Sync {
    /// Modern chunk-streaming invocation.
    fn synthesize_chunked(
        &self,
        text: &str,
        controls: &SynthesisControls,
    ) -> std::result::Result<ChunkStream<'_>, StrategyError>;

    /// Legacy sink-writer invocation: write a complete WAV container
    /// for `text` into `sink`. `controls == None` means engine
    /// defaults (the retry form).
    fn write_wav(
        &self,
        text: &str,
        controls: Option<&SynthesisControls>,
        sink: &Path,
    ) -> std::result::Result<(), StrategyError>;
}

/// Resolves a voice identifier to a loaded synthesis session.
pub trait VoiceLoader: Send + Sync {
    fn load(&self, voice: &str) -> Result<std::sync::Arc<dyn VoiceSession>>;
}
