//! Error types for the sesle engine runtime.

use thiserror::Error;

/// All errors surfaced by the core runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// The request itself is unusable (empty text, absent audio file).
    /// Maps to a client error at the HTTP layer.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The model artifact could not be located on disk.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The model artifact exists but failed to initialize. The session
    /// cache slot is left unchanged when this is returned.
    #[error("model failed to load: {0}")]
    ModelLoad(String),

    /// Synthesis failed after a voice session was resolved. The session
    /// stays cached so a later request can retry.
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Recognition failed after a model session was resolved.
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
