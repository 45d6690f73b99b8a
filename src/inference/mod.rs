//! Inference module for bird image classification.

mod classifier;
mod loader;
mod model;
mod onnx;
mod preprocess;
mod provider;

pub use classifier::{PredictionResult, argmax, classify, prediction_from_scores};
pub use loader::ModelLoader;
pub use model::{ClassifierHandle, ScoreModel, TensorSpec};
pub use onnx::OnnxModel;
pub use preprocess::{ImageTensor, decode, detect_format, preprocess, to_tensor};
