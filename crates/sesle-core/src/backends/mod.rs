//! Production engine adapters behind the session traits.

pub mod piper;
pub mod whisper;

pub use piper::PiperVoiceLoader;
pub use whisper::WhisperRecognizerLoader;
