//! ONNX Runtime backed classifier model.

use crate::config::InferenceDevice;
use crate::error::{Error, Result};
use crate::inference::model::{ScoreModel, TensorSpec};
use crate::inference::{ImageTensor, provider};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::{Tensor, ValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Classifier backed by an ONNX Runtime session.
///
/// `Session::run` needs exclusive access, so concurrent callers are
/// serialized on the session mutex. Weights are never modified.
pub struct OnnxModel {
    session: Mutex<Session>,
    input: TensorSpec,
    output: TensorSpec,
}

impl OnnxModel {
    /// Open an ONNX model file on the requested device.
    pub fn load(path: &Path, device: InferenceDevice) -> Result<Self> {
        let load_error = |reason: String| Error::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(load_error("file does not exist".to_string()));
        }

        let builder = Session::builder()
            .map_err(|e| load_error(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(e.to_string()))?;

        let (mut builder, device_label) = provider::configure(builder, device, path)?;

        let session = builder
            .commit_from_file(path)
            .map_err(|e| load_error(e.to_string()))?;

        let inputs = session.inputs();
        if inputs.len() != 1 {
            return Err(load_error(format!(
                "expected exactly one model input, found {}",
                inputs.len()
            )));
        }
        let input = inputs
            .first()
            .and_then(|i| tensor_spec(i.name(), i.dtype()))
            .ok_or_else(|| load_error("model input is not a tensor".to_string()))?;

        let output = session
            .outputs()
            .first()
            .and_then(|o| tensor_spec(o.name(), o.dtype()))
            .ok_or_else(|| load_error("model has no tensor output".to_string()))?;

        debug!("Model input: {input}, output: {output}");
        info!("Loaded model: {}, device: {}", path.display(), device_label);

        Ok(Self {
            session: Mutex::new(session),
            input,
            output,
        })
    }
}

fn tensor_spec(name: &str, value_type: &ValueType) -> Option<TensorSpec> {
    match value_type {
        ValueType::Tensor { ty, shape, .. } => Some(TensorSpec::new(
            name,
            shape.iter().copied().collect(),
            format!("{ty:?}"),
        )),
        _ => None,
    }
}

impl ScoreModel for OnnxModel {
    fn input(&self) -> &TensorSpec {
        &self.input
    }

    fn output(&self) -> &TensorSpec {
        &self.output
    }

    fn scores(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let inference_error = |reason: String| Error::Inference { reason };

        let value = Tensor::from_array((tensor.shape().to_vec(), tensor.to_vec()))
            .map_err(|e| inference_error(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| inference_error("model session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input.name.as_str() => value])
            .map_err(|e| inference_error(e.to_string()))?;

        let (_, scores) = outputs[self.output.name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| inference_error(e.to_string()))?;

        Ok(scores.to_vec())
    }
}
