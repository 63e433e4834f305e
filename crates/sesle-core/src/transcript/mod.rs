//! Transcript result types and the recognition session surface.

mod assembler;

pub use assembler::assemble;

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// One recognized word with timing and confidence.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    pub word: String,
    pub probability: f64,
}

/// One contiguous span of recognized speech.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub id: i64,
    pub seek: i64,
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// Reserved; token IDs are not part of this engine's contract.
    pub tokens: Vec<i64>,
    pub temperature: f64,
    pub avg_logprob: f64,
    pub compression_ratio: f64,
    pub no_speech_prob: f64,
    pub words: Vec<Word>,
}

/// The complete, ordered transcription of one audio file.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResult {
    pub language: String,
    pub language_probability: f64,
    pub duration: f64,
    pub segments: Vec<Segment>,
}

/// A word as produced by the recognition engine, before assembly.
/// `probability` is `None` when the engine version omits it.
#[derive(Debug, Clone)]
pub struct RawWord {
    pub start: f64,
    pub end: f64,
    pub word: String,
    pub probability: Option<f64>,
}

/// A segment as produced by the recognition engine, before assembly.
#[derive(Debug, Clone)]
pub struct RawSegment {
    pub id: i64,
    pub seek: i64,
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub temperature: f64,
    pub avg_logprob: f64,
    pub compression_ratio: f64,
    pub no_speech_prob: f64,
    pub words: Vec<RawWord>,
}

/// Utterance-level metadata reported alongside the segment sequence.
#[derive(Debug, Clone)]
pub struct TranscriptInfo {
    pub language: String,
    pub language_probability: f64,
    pub duration: f64,
}

/// Finite, non-restartable producer of recognized segments. Consumed
/// exactly once, in order; forcing it runs the underlying inference.
pub type SegmentStream = Box<dyn Iterator<Item = Result<RawSegment>> + Send>;

/// Per-request recognition options.
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    pub language: String,
}

/// An initialized, ready-to-use recognition session.
pub trait RecognizerSession: Send + Sync {
    fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<(SegmentStream, TranscriptInfo)>;
}

/// Resolves a model-size identifier to a loaded recognition session.
pub trait RecognizerLoader: Send + Sync {
    fn load(
        &self,
        model: &str,
        profile: &crate::config::ComputeProfile,
    ) -> Result<std::sync::Arc<dyn RecognizerSession>>;
}
