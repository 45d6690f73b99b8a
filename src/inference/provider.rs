//! Execution provider selection for ONNX Runtime sessions.

use crate::config::InferenceDevice;
use crate::error::{Error, Result};
use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use ort::session::builder::SessionBuilder;
use std::path::Path;
use tracing::{info, warn};

/// Register execution providers on a session builder for the requested device.
///
/// Returns the configured builder and a short label for logging.
pub fn configure(
    builder: SessionBuilder,
    device: InferenceDevice,
    model_path: &Path,
) -> Result<(SessionBuilder, &'static str)> {
    let load_error = |reason: String| Error::ModelLoad {
        path: model_path.to_path_buf(),
        reason,
    };

    match device {
        InferenceDevice::Cpu => {
            info!("Requested device: CPU");
            Ok((builder, "CPU"))
        }
        InferenceDevice::Auto => {
            if cuda_available() {
                info!("Auto mode: CUDA available, attempting GPU");
                let builder = builder
                    .with_execution_providers([CUDAExecutionProvider::default().build()])
                    .map_err(|e| load_error(e.to_string()))?;
                Ok((builder, "CUDA"))
            } else {
                info!("Auto mode: No GPU providers available, using CPU");
                Ok((builder, "Auto (CPU)"))
            }
        }
        InferenceDevice::Cuda => {
            if !cuda_available() {
                return Err(load_error(
                    "CUDA provider not available\n\nTry one of:\n  aves --cpu     (use CPU)\n  aves           (auto mode with fallback)"
                        .to_string(),
                ));
            }
            info!("Requested device: CUDA");
            let builder = builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .build()
                    .error_on_failure()])
                .map_err(|e| load_error(e.to_string()))?;
            Ok((builder, "CUDA"))
        }
    }
}

fn cuda_available() -> bool {
    match CUDAExecutionProvider::default().is_available() {
        Ok(available) => available,
        Err(e) => {
            warn!("Could not query CUDA availability: {e}");
            false
        }
    }
}
