//! Whisper recognition adapter.
//!
//! Wraps a `whisper_rs::WhisperContext` loaded from a GGML artifact
//! (`<models_dir>/ggml-<size>.bin`). A fresh `WhisperState` is created
//! per call. Token-level timestamps are merged into words; fields the
//! backend does not report (seek, temperature, avg_logprob,
//! compression_ratio, no_speech_prob) stay at zero.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::read_wav_mono_16k;
use crate::config::ComputeProfile;
use crate::error::{Error, Result};
use crate::transcript::{
    RawSegment, RawWord, RecognizerLoader, RecognizerSession, SegmentStream, TranscribeOptions,
    TranscriptInfo,
};

const SAMPLE_RATE: u32 = 16_000;
const BEAM_SIZE: i32 = 5;

/// Loads Whisper models from a directory of GGML artifacts.
pub struct WhisperRecognizerLoader {
    models_dir: PathBuf,
}

impl WhisperRecognizerLoader {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }
}

impl RecognizerLoader for WhisperRecognizerLoader {
    fn load(&self, model: &str, profile: &ComputeProfile) -> Result<Arc<dyn RecognizerSession>> {
        let path = self.models_dir.join(format!("ggml-{model}.bin"));
        if !path.exists() {
            return Err(Error::ModelNotFound(format!(
                "model artifact missing: {}",
                path.display()
            )));
        }

        let path_str = path.to_str().ok_or_else(|| {
            Error::ModelNotFound(format!("model path is not UTF-8: {}", path.display()))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| Error::ModelLoad(format!("whisper context init for '{model}': {e}")))?;

        info!(
            model,
            device = %profile.device,
            precision = %profile.precision,
            workers = profile.worker_count,
            "recognition model loaded"
        );

        Ok(Arc::new(WhisperRecognizer {
            ctx,
            profile: profile.clone(),
        }))
    }
}

/// A loaded Whisper recognition session.
///
/// The compute profile is the one captured at load time; later
/// requests against the same model identifier keep using it.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
    profile: ComputeProfile,
}

impl RecognizerSession for WhisperRecognizer {
    fn transcribe(
        &self,
        audio_path: &Path,
        options: &TranscribeOptions,
    ) -> Result<(SegmentStream, TranscriptInfo)> {
        let samples = read_wav_mono_16k(audio_path)?;
        let duration = samples.len() as f64 / SAMPLE_RATE as f64;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: BEAM_SIZE,
            patience: -1.0,
        });
        params.set_language(Some(options.language.as_str()));
        params.set_n_threads(self.profile.worker_count.max(1) as i32);
        params.set_token_timestamps(true);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| Error::RecognitionFailed(format!("whisper state init: {e}")))?;

        state
            .full(params, &samples)
            .map_err(|e| Error::RecognitionFailed(format!("whisper inference: {e}")))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| Error::RecognitionFailed(format!("segment count: {e}")))?;

        let mut segments = Vec::with_capacity(n_segments as usize);
        for i in 0..n_segments {
            segments.push(collect_segment(&state, i)?);
        }

        debug!(
            segments = segments.len(),
            duration, "recognition pass complete"
        );

        let info = TranscriptInfo {
            language: options.language.clone(),
            // The language is caller-pinned rather than detected.
            language_probability: 1.0,
            duration,
        };

        Ok((Box::new(segments.into_iter().map(Ok)), info))
    }
}

fn collect_segment(state: &whisper_rs::WhisperState, index: i32) -> Result<RawSegment> {
    let text = state
        .full_get_segment_text(index)
        .map_err(|e| Error::RecognitionFailed(format!("segment {index}: {e}")))?;

    // Timestamps arrive in centiseconds.
    let start = state.full_get_segment_t0(index).unwrap_or(0).max(0) as f64 / 100.0;
    let end = state.full_get_segment_t1(index).unwrap_or(0).max(0) as f64 / 100.0;

    Ok(RawSegment {
        id: index as i64,
        seek: 0,
        start,
        end,
        text,
        temperature: 0.0,
        avg_logprob: 0.0,
        compression_ratio: 0.0,
        no_speech_prob: 0.0,
        words: collect_words(state, index)?,
    })
}

/// Merge sub-word tokens into words. Whisper marks word boundaries
/// with a leading space on the first token of each word.
fn collect_words(state: &whisper_rs::WhisperState, index: i32) -> Result<Vec<RawWord>> {
    let n_tokens = state
        .full_n_tokens(index)
        .map_err(|e| Error::RecognitionFailed(format!("token count for segment {index}: {e}")))?;

    let mut words: Vec<RawWord> = Vec::new();
    let mut probs: Vec<Vec<f64>> = Vec::new();

    for j in 0..n_tokens {
        let token_text = state
            .full_get_token_text(index, j)
            .map_err(|e| Error::RecognitionFailed(format!("token {index}/{j}: {e}")))?;
        if token_text.starts_with("[_") {
            continue;
        }

        let data = state
            .full_get_token_data(index, j)
            .map_err(|e| Error::RecognitionFailed(format!("token data {index}/{j}: {e}")))?;
        let t0 = data.t0.max(0) as f64 / 100.0;
        let t1 = data.t1.max(0) as f64 / 100.0;

        let starts_word = token_text.starts_with(' ') || words.is_empty();
        if starts_word {
            words.push(RawWord {
                start: t0,
                end: t1,
                word: token_text,
                probability: None,
            });
            probs.push(vec![data.p as f64]);
        } else if let (Some(word), Some(word_probs)) = (words.last_mut(), probs.last_mut()) {
            word.word.push_str(&token_text);
            word.end = t1;
            word_probs.push(data.p as f64);
        }
    }

    for (word, word_probs) in words.iter_mut().zip(&probs) {
        if !word_probs.is_empty() {
            word.probability =
                Some(word_probs.iter().sum::<f64>() / word_probs.len() as f64);
        }
        word.word = word.word.trim_start().to_string();
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_is_model_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = WhisperRecognizerLoader::new(dir.path().to_path_buf());
        let err = loader.load("large-v3", &ComputeProfile::default()).unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }

    #[test]
    fn artifact_path_follows_ggml_convention() {
        let dir = tempfile::tempdir().unwrap();
        let loader = WhisperRecognizerLoader::new(dir.path().to_path_buf());
        // A present-but-bogus artifact must get past discovery and
        // fail at context init instead.
        std::fs::write(dir.path().join("ggml-tiny.bin"), b"not a model").unwrap();
        let err = loader.load("tiny", &ComputeProfile::default()).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
