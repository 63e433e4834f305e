//! Static enumeration of known model identifiers.

/// Recognition model sizes the service advertises. Artifact discovery
/// is by filename convention; this list only backs the `/models`
/// enumeration and is not consulted when resolving a request.
pub const RECOGNIZER_MODELS: [&str; 12] = [
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large-v1",
    "large-v2",
    "large-v3",
    "large-v3-turbo",
];

/// Voice used when a synthesis request names none.
pub const DEFAULT_VOICE: &str = "tr_TR-dfki-medium";

/// Recognition model used when a transcription request names none.
pub const DEFAULT_RECOGNIZER_MODEL: &str = "large-v3";

/// Language assumed when a transcription request names none.
pub const DEFAULT_LANGUAGE: &str = "tr";
