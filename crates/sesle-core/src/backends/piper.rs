//! Piper voice adapter.
//!
//! Artifact layout: `<voices_dir>/<voice>.onnx` plus the sidecar
//! `<voice>.onnx.json` config. The sample rate comes from the config
//! JSON (`audio.sample_rate`); the synthesizer's chunk type does not
//! carry it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use piper_rs::synth::PiperSpeechSynthesizer;
use tracing::info;

use crate::audio::f32_to_pcm16;
use crate::error::{Error, Result};
use crate::synthesis::{
    AudioChunk, ChunkStream, StrategyError, SynthesisControls, VoiceLoader, VoiceSession,
};

/// Loads Piper voices from a directory of ONNX artifacts.
pub struct PiperVoiceLoader {
    voices_dir: PathBuf,
}

impl PiperVoiceLoader {
    pub fn new(voices_dir: PathBuf) -> Self {
        Self { voices_dir }
    }
}

impl VoiceLoader for PiperVoiceLoader {
    fn load(&self, voice: &str) -> Result<Arc<dyn VoiceSession>> {
        let model_path = self.voices_dir.join(format!("{voice}.onnx"));
        let config_path = self.voices_dir.join(format!("{voice}.onnx.json"));

        if !model_path.exists() || !config_path.exists() {
            return Err(Error::ModelNotFound(format!(
                "voice artifact missing: {}",
                model_path.display()
            )));
        }

        let sample_rate = read_sample_rate(&config_path)?;
        let model = piper_rs::from_config_path(&config_path)
            .map_err(|e| Error::ModelLoad(format!("piper load error for '{voice}': {e}")))?;
        let synth = PiperSpeechSynthesizer::new(model)
            .map_err(|e| Error::ModelLoad(format!("piper synthesizer init for '{voice}': {e}")))?;

        info!(voice, sample_rate, "voice model loaded");

        Ok(Arc::new(PiperVoice { synth, sample_rate }))
    }
}

fn read_sample_rate(config_path: &Path) -> Result<u32> {
    let text = std::fs::read_to_string(config_path)?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| Error::ModelLoad(format!("voice config is not valid JSON: {e}")))?;

    json.get("audio")
        .and_then(|a| a.get("sample_rate"))
        .and_then(|sr| sr.as_u64())
        .map(|sr| sr as u32)
        .ok_or_else(|| {
            Error::ModelLoad(format!(
                "missing audio.sample_rate in {}",
                config_path.display()
            ))
        })
}

/// A loaded Piper voice.
pub struct PiperVoice {
    synth: PiperSpeechSynthesizer,
    sample_rate: u32,
}

impl VoiceSession for PiperVoice {
    fn synthesize_chunked(
        &self,
        text: &str,
        controls: &SynthesisControls,
    ) -> std::result::Result<ChunkStream<'_>, StrategyError> {
        // The streaming interface of this piper build exposes no
        // speaker selection or naturalness overrides; reporting the
        // mismatch routes such requests to the sink writer.
        if !controls.is_default() {
            return Err(StrategyError::Unsupported(
                "chunked interface does not accept speaker or naturalness overrides".to_string(),
            ));
        }

        let stream = self
            .synth
            .synthesize_parallel(text.to_string(), None)
            .map_err(|e| {
                StrategyError::Failed(Error::SynthesisFailed(format!("piper synthesis: {e}")))
            })?;

        let sample_rate = self.sample_rate;
        Ok(Box::new(stream.map(move |part| {
            let samples = part
                .map_err(|e| Error::SynthesisFailed(format!("piper chunk: {e}")))?
                .into_vec();
            Ok(AudioChunk {
                pcm16: Some(f32_to_pcm16(&samples)),
                sample_rate,
                channels: 1,
            })
        })))
    }

    fn write_wav(
        &self,
        text: &str,
        controls: Option<&SynthesisControls>,
        sink: &Path,
    ) -> std::result::Result<(), StrategyError> {
        if let Some(controls) = controls {
            if !controls.is_default() {
                return Err(StrategyError::Unsupported(
                    "this piper build does not accept speaker or naturalness overrides"
                        .to_string(),
                ));
            }
        }

        let stream = self
            .synth
            .synthesize_parallel(text.to_string(), None)
            .map_err(|e| {
                StrategyError::Failed(Error::SynthesisFailed(format!("piper synthesis: {e}")))
            })?;

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(sink, spec).map_err(|e| {
            StrategyError::Failed(Error::SynthesisFailed(format!("sink create: {e}")))
        })?;

        for part in stream {
            let samples = part
                .map_err(|e| {
                    StrategyError::Failed(Error::SynthesisFailed(format!("piper chunk: {e}")))
                })?
                .into_vec();
            for sample in samples {
                let quantized = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                writer.write_sample(quantized).map_err(|e| {
                    StrategyError::Failed(Error::SynthesisFailed(format!("sink write: {e}")))
                })?;
            }
        }

        writer.finalize().map_err(|e| {
            StrategyError::Failed(Error::SynthesisFailed(format!("sink finalize: {e}")))
        })
    }
}
