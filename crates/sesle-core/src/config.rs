//! Configuration types for the sesle runtime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding Piper voice artifacts (`<voice>.onnx` + `<voice>.onnx.json`).
    #[serde(default = "default_voices_dir")]
    pub voices_dir: PathBuf,

    /// Directory holding Whisper GGML artifacts (`ggml-<size>.bin`).
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voices_dir: default_voices_dir(),
            models_dir: default_models_dir(),
        }
    }
}

fn default_voices_dir() -> PathBuf {
    dir_from_env("SESLE_VOICES_DIR").unwrap_or_else(|| data_dir().join("voices"))
}

fn default_models_dir() -> PathBuf {
    dir_from_env("SESLE_MODELS_DIR").unwrap_or_else(|| data_dir().join("models"))
}

fn dir_from_env(var: &str) -> Option<PathBuf> {
    let raw = std::env::var(var).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sesle")
}

/// Compute settings captured when a model session is loaded.
///
/// The session cache keys on the model identifier only; a request that
/// changes these fields without changing the identifier keeps using the
/// profile the session was loaded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeProfile {
    #[serde(default = "default_device")]
    pub device: String,

    /// Quantization hint (`int8`, `int16`, `float16`, `float32`).
    #[serde(default = "default_precision")]
    pub precision: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
}

impl Default for ComputeProfile {
    fn default() -> Self {
        Self {
            device: default_device(),
            precision: default_precision(),
            worker_count: default_worker_count(),
        }
    }
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_precision() -> String {
    "int8".to_string()
}

fn default_worker_count() -> usize {
    1
}
