//! Load-once model loader.

use crate::config::InferenceDevice;
use crate::error::Result;
use crate::inference::OnnxModel;
use crate::inference::model::{ClassifierHandle, ScoreModel};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

type Opener = dyn Fn(&Path) -> Result<Box<dyn ScoreModel>> + Send + Sync;

/// Opens the classifier artifact on first use and hands out the same handle
/// afterwards.
///
/// The loader is an ordinary value: construct it at startup and pass the
/// handle it returns to whatever needs to classify.
pub struct ModelLoader {
    path: PathBuf,
    open: Box<Opener>,
    handle: OnceLock<Arc<ClassifierHandle>>,
}

impl ModelLoader {
    /// Loader for an ONNX model on the given device.
    pub fn new(path: impl Into<PathBuf>, device: InferenceDevice) -> Self {
        Self::with_opener(path, move |path| {
            let model = OnnxModel::load(path, device)?;
            Ok(Box::new(model) as Box<dyn ScoreModel>)
        })
    }

    /// Loader with a custom backend.
    pub fn with_opener<F>(path: impl Into<PathBuf>, open: F) -> Self
    where
        F: Fn(&Path) -> Result<Box<dyn ScoreModel>> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            open: Box::new(open),
            handle: OnceLock::new(),
        }
    }

    /// Path of the artifact this loader opens.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the loaded handle, opening the artifact on the first call.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn load(&self) -> Result<Arc<ClassifierHandle>> {
        if let Some(handle) = self.handle.get() {
            debug!("Reusing loaded model: {}", self.path.display());
            return Ok(Arc::clone(handle));
        }

        info!("Loading model: {}", self.path.display());
        let model = (self.open)(&self.path)?;
        let handle = Arc::new(ClassifierHandle::new(model, &self.path)?);
        info!(
            "Model ready: input {}, output {}",
            handle.input(),
            handle.output()
        );

        Ok(Arc::clone(self.handle.get_or_init(|| handle)))
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("path", &self.path)
            .field("loaded", &self.handle.get().is_some())
            .finish_non_exhaustive()
    }
}
