//! Recognition runtime path.

use crate::error::{Error, Result};
use crate::runtime::service::SpeechRuntime;
use crate::runtime::TranscriptionRequest;
use crate::transcript::{self, TranscribeOptions, TranscriptionResult};

impl SpeechRuntime {
    /// Transcribe the file named by `request` into an ordered,
    /// word-timed transcript.
    ///
    /// The audio path is checked before the model slot is touched, so
    /// a bad path never evicts or loads a session. The cached
    /// recognizer is reused whenever the model identifier matches; the
    /// compute profile only matters at load time.
    pub async fn transcribe(&self, request: TranscriptionRequest) -> Result<TranscriptionResult> {
        if !request.audio_path.exists() {
            return Err(Error::InvalidInput(format!(
                "audio file not found: {}",
                request.audio_path.display()
            )));
        }

        let session = {
            let loader = self.recognizer_loader.clone();
            let model = request.model.clone();
            let profile = request.profile.clone();
            self.recognizers
                .acquire(&request.model, move || async move {
                    tokio::task::spawn_blocking(move || loader.load(&model, &profile))
                        .await
                        .map_err(|e| Error::ModelLoad(format!("model load task failed: {e}")))?
                })
                .await?
        };

        let options = TranscribeOptions {
            language: request.language,
        };
        let audio_path = request.audio_path;
        tokio::task::spawn_blocking(move || {
            let (segments, info) = session.transcribe(&audio_path, &options)?;
            transcript::assemble(segments, info)
        })
        .await
        .map_err(|e| Error::RecognitionFailed(format!("transcription task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComputeProfile;
    use crate::transcript::{
        RawSegment, RawWord, RecognizerLoader, RecognizerSession, SegmentStream, TranscriptInfo,
    };
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct CannedRecognizer;

    impl RecognizerSession for CannedRecognizer {
        fn transcribe(
            &self,
            _audio_path: &Path,
            options: &TranscribeOptions,
        ) -> Result<(SegmentStream, TranscriptInfo)> {
            let segment = RawSegment {
                id: 0,
                seek: 0,
                start: 0.0,
                end: 1.4,
                text: " merhaba dünya ".to_string(),
                temperature: 0.0,
                avg_logprob: 0.0,
                compression_ratio: 0.0,
                no_speech_prob: 0.0,
                words: vec![RawWord {
                    start: 0.0,
                    end: 0.6,
                    word: "merhaba".to_string(),
                    probability: None,
                }],
            };
            let info = TranscriptInfo {
                language: options.language.clone(),
                language_probability: 1.0,
                duration: 1.4,
            };
            Ok((Box::new(std::iter::once(Ok(segment))), info))
        }
    }

    struct CountingRecognizerLoader {
        loads: AtomicUsize,
        profiles: Mutex<Vec<ComputeProfile>>,
    }

    impl CountingRecognizerLoader {
        fn new() -> Self {
            Self {
                loads: AtomicUsize::new(0),
                profiles: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecognizerLoader for CountingRecognizerLoader {
        fn load(
            &self,
            _model: &str,
            profile: &ComputeProfile,
        ) -> Result<Arc<dyn RecognizerSession>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.profiles.lock().unwrap().push(profile.clone());
            Ok(Arc::new(CannedRecognizer))
        }
    }

    struct NoVoices;

    impl crate::synthesis::VoiceLoader for NoVoices {
        fn load(&self, _voice: &str) -> Result<Arc<dyn crate::synthesis::VoiceSession>> {
            panic!("voice loader must not be touched by recognition");
        }
    }

    fn runtime_with(loader: Arc<CountingRecognizerLoader>) -> SpeechRuntime {
        SpeechRuntime::with_loaders(Arc::new(NoVoices), loader)
    }

    fn request(path: PathBuf, model: &str) -> TranscriptionRequest {
        TranscriptionRequest {
            audio_path: path,
            model: model.to_string(),
            language: "tr".to_string(),
            profile: ComputeProfile::default(),
        }
    }

    fn existing_audio() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        std::fs::write(&path, b"not real audio").unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn transcribe_assembles_canned_segments() {
        let (_dir, path) = existing_audio();
        let runtime = runtime_with(Arc::new(CountingRecognizerLoader::new()));

        let result = runtime.transcribe(request(path, "large-v3")).await.unwrap();
        assert_eq!(result.language, "tr");
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].text, "merhaba dünya");
        assert_eq!(result.segments[0].words[0].probability, 1.0);
    }

    #[tokio::test]
    async fn missing_audio_is_rejected_before_any_load() {
        let loader = Arc::new(CountingRecognizerLoader::new());
        let runtime = runtime_with(loader.clone());

        let err = runtime
            .transcribe(request(PathBuf::from("/no/such/clip.wav"), "large-v3"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
        assert_eq!(runtime.loaded_model().await, None);
    }

    #[tokio::test]
    async fn same_model_loads_once_and_switch_reloads() {
        let (_dir, path) = existing_audio();
        let loader = Arc::new(CountingRecognizerLoader::new());
        let runtime = runtime_with(loader.clone());

        runtime
            .transcribe(request(path.clone(), "large-v3"))
            .await
            .unwrap();
        runtime
            .transcribe(request(path.clone(), "large-v3"))
            .await
            .unwrap();
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.loaded_model().await, Some("large-v3".to_string()));

        runtime.transcribe(request(path, "base")).await.unwrap();
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
        assert_eq!(runtime.loaded_model().await, Some("base".to_string()));
    }

    #[tokio::test]
    async fn profile_change_alone_does_not_reload() {
        let (_dir, path) = existing_audio();
        let loader = Arc::new(CountingRecognizerLoader::new());
        let runtime = runtime_with(loader.clone());

        runtime
            .transcribe(request(path.clone(), "large-v3"))
            .await
            .unwrap();

        let mut hot = request(path, "large-v3");
        hot.profile = ComputeProfile {
            device: "cuda".to_string(),
            precision: "float16".to_string(),
            worker_count: 4,
        };
        runtime.transcribe(hot).await.unwrap();

        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        let profiles = loader.profiles.lock().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].device, "cpu");
    }
}
