//! Runtime construction and shared accessors.

use std::sync::Arc;

use crate::backends::{PiperVoiceLoader, WhisperRecognizerLoader};
use crate::config::EngineConfig;
use crate::session::{ModelSlot, SessionKind};
use crate::synthesis::{VoiceLoader, VoiceSession};
use crate::transcript::{RecognizerLoader, RecognizerSession};

/// Owns one synthesis slot and one recognition slot plus the loaders
/// that fill them. Everything behind it is reachable through
/// [`speak`](SpeechRuntime::speak) and
/// [`transcribe`](SpeechRuntime::transcribe).
pub struct SpeechRuntime {
    pub(crate) voice_loader: Arc<dyn VoiceLoader>,
    pub(crate) recognizer_loader: Arc<dyn RecognizerLoader>,
    pub(crate) voices: ModelSlot<dyn VoiceSession>,
    pub(crate) recognizers: ModelSlot<dyn RecognizerSession>,
}

impl SpeechRuntime {
    /// Build a runtime with the production Piper/Whisper loaders.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_loaders(
            Arc::new(PiperVoiceLoader::new(config.voices_dir.clone())),
            Arc::new(WhisperRecognizerLoader::new(config.models_dir.clone())),
        )
    }

    /// Build a runtime with explicit loaders. Tests substitute doubles
    /// here; production code goes through [`SpeechRuntime::new`].
    pub fn with_loaders(
        voice_loader: Arc<dyn VoiceLoader>,
        recognizer_loader: Arc<dyn RecognizerLoader>,
    ) -> Self {
        Self {
            voice_loader,
            recognizer_loader,
            voices: ModelSlot::new(SessionKind::Synthesis),
            recognizers: ModelSlot::new(SessionKind::Recognition),
        }
    }

    /// Identifier of the currently cached voice, if any.
    pub async fn loaded_voice(&self) -> Option<String> {
        self.voices.current_identifier().await
    }

    /// Identifier of the currently cached recognition model, if any.
    pub async fn loaded_model(&self) -> Option<String> {
        self.recognizers.current_identifier().await
    }
}
