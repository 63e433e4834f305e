//! Synthesis runtime path.

use tracing::debug;

use crate::audio::wav;
use crate::error::{Error, Result};
use crate::runtime::service::SpeechRuntime;
use crate::synthesis::{self, SynthesisRequest, SynthesizedAudio};

impl SpeechRuntime {
    /// Produce a complete WAV container for `request`.
    ///
    /// Resolves the voice session through the single-slot cache (a
    /// voice change triggers a blocking reload), negotiates an
    /// invocation strategy, and wraps raw PCM output in the canonical
    /// header. Legacy sink-writer output is already a container and is
    /// passed through untouched.
    pub async fn speak(&self, request: SynthesisRequest) -> Result<Vec<u8>> {
        if request.text.trim().is_empty() {
            return Err(Error::InvalidInput("text is required".to_string()));
        }

        let session = {
            let loader = self.voice_loader.clone();
            let voice = request.voice.clone();
            self.voices
                .acquire(&request.voice, move || async move {
                    tokio::task::spawn_blocking(move || loader.load(&voice))
                        .await
                        .map_err(|e| Error::ModelLoad(format!("voice load task failed: {e}")))?
                })
                .await?
        };

        let audio = tokio::task::spawn_blocking(move || synthesis::synthesize(session.as_ref(), &request))
            .await
            .map_err(|e| Error::SynthesisFailed(format!("synthesis task failed: {e}")))??;

        Ok(match audio {
            SynthesizedAudio::Pcm(pcm) => {
                debug!(
                    frames = pcm.frames(),
                    sample_rate = pcm.sample_rate,
                    "encoding PCM output"
                );
                wav::encode(&pcm)
            }
            SynthesizedAudio::Container(bytes) => bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PcmBuffer;
    use crate::synthesis::{
        AudioChunk, ChunkStream, StrategyError, SynthesisControls, VoiceLoader, VoiceSession,
    };
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedPcmSession {
        pcm: Vec<u8>,
        sample_rate: u32,
    }

    impl VoiceSession for FixedPcmSession {
        fn synthesize_chunked(
            &self,
            _text: &str,
            _controls: &SynthesisControls,
        ) -> std::result::Result<ChunkStream<'_>, StrategyError> {
            let chunk = AudioChunk {
                pcm16: Some(self.pcm.clone()),
                sample_rate: self.sample_rate,
                channels: 1,
            };
            Ok(Box::new(std::iter::once(Ok(chunk))))
        }

        fn write_wav(
            &self,
            _text: &str,
            _controls: Option<&SynthesisControls>,
            _sink: &Path,
        ) -> std::result::Result<(), StrategyError> {
            Err(StrategyError::Unsupported("chunked only".into()))
        }
    }

    struct CountingVoiceLoader {
        loads: AtomicUsize,
        fail_with: Option<fn() -> Error>,
    }

    impl CountingVoiceLoader {
        fn ok() -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(f: fn() -> Error) -> Self {
            Self {
                loads: AtomicUsize::new(0),
                fail_with: Some(f),
            }
        }
    }

    impl VoiceLoader for CountingVoiceLoader {
        fn load(&self, _voice: &str) -> Result<Arc<dyn VoiceSession>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            Ok(Arc::new(FixedPcmSession {
                pcm: vec![0, 1, 2, 3, 4, 5],
                sample_rate: 22_050,
            }))
        }
    }

    struct NoRecognizer;

    impl crate::transcript::RecognizerLoader for NoRecognizer {
        fn load(
            &self,
            _model: &str,
            _profile: &crate::config::ComputeProfile,
        ) -> Result<Arc<dyn crate::transcript::RecognizerSession>> {
            panic!("recognition loader must not be touched by synthesis");
        }
    }

    fn runtime_with(loader: Arc<CountingVoiceLoader>) -> SpeechRuntime {
        SpeechRuntime::with_loaders(loader, Arc::new(NoRecognizer))
    }

    fn request(text: &str, voice: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice: voice.to_string(),
            controls: SynthesisControls::default(),
        }
    }

    #[tokio::test]
    async fn speak_wraps_pcm_in_canonical_container() {
        let runtime = runtime_with(Arc::new(CountingVoiceLoader::ok()));
        let wav = runtime
            .speak(request("Merhaba", "tr_TR-dfki-medium"))
            .await
            .unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        let declared = u32::from_le_bytes(wav[40..44].try_into().unwrap());
        assert_eq!(declared as usize, wav.len() - 44);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_load() {
        let loader = Arc::new(CountingVoiceLoader::ok());
        let runtime = runtime_with(loader.clone());

        let err = runtime
            .speak(request("   ", "tr_TR-dfki-medium"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn same_voice_loads_once_across_requests() {
        let loader = Arc::new(CountingVoiceLoader::ok());
        let runtime = runtime_with(loader.clone());

        runtime
            .speak(request("bir", "tr_TR-dfki-medium"))
            .await
            .unwrap();
        runtime
            .speak(request("iki", "tr_TR-dfki-medium"))
            .await
            .unwrap();
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);

        runtime
            .speak(request("üç", "en_US-amy-low"))
            .await
            .unwrap();
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_voice_surfaces_model_not_found_and_keeps_slot_empty() {
        let loader = Arc::new(CountingVoiceLoader::failing(|| {
            Error::ModelNotFound("voice artifact missing".into())
        }));
        let runtime = runtime_with(loader);

        let err = runtime
            .speak(request("Merhaba", "no-such-voice"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
        assert_eq!(runtime.loaded_voice().await, None);
    }

    #[test]
    fn pcm_frames_match_container_payload() {
        let pcm = PcmBuffer {
            samples: vec![0u8; 64],
            sample_rate: 22_050,
            channels: 1,
        };
        assert_eq!(wav::encode(&pcm).len(), 44 + 64);
    }
}
