//! Configuration type definitions.

use crate::constants::{DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL_PATH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier artifact settings.
    pub model: ModelConfig,

    /// Inference settings.
    pub inference: InferenceConfig,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Web page display settings.
    pub display: DisplayConfig,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputMode {
    /// Plain text for terminals.
    #[default]
    Human,
    /// A single JSON envelope on stdout.
    Json,
}

/// Classifier artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

/// Inference device configuration.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InferenceDevice {
    /// Try CUDA, fall back to CPU silently.
    #[default]
    Auto,
    /// Force CPU inference.
    Cpu,
    /// Force CUDA, fail if unavailable.
    Cuda,
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda => write!(f, "cuda"),
        }
    }
}

/// Inference settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Device to use for inference.
    pub device: InferenceDevice,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Web page display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial state of the "show confidence" checkbox.
    pub show_confidence: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_confidence: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model.path, PathBuf::from("models/modelo_convertido.onnx"));
        assert_eq!(config.inference.device, InferenceDevice::Auto);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.display.show_confidence);
    }

    #[test]
    fn test_inference_device_display() {
        assert_eq!(InferenceDevice::Auto.to_string(), "auto");
        assert_eq!(InferenceDevice::Cpu.to_string(), "cpu");
        assert_eq!(InferenceDevice::Cuda.to_string(), "cuda");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[inference]\ndevice = \"cpu\"\n").unwrap();
        assert_eq!(config.inference.device, InferenceDevice::Cpu);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert!(config.display.show_confidence);
    }

    #[test]
    fn test_all_sections_serialize() {
        let text = toml::to_string(&Config::default()).unwrap();
        for section in ["[model]", "[inference]", "[server]", "[display]"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert_eq!(OutputMode::default(), OutputMode::Human);
    }
}
