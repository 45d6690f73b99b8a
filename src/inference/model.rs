//! Loaded-model handle and the backend trait behind it.

use crate::catalog::SPECIES_COUNT;
use crate::constants::input;
use crate::error::{Error, Result};
use crate::inference::ImageTensor;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Name, shape and element type of a model input or output.
///
/// Negative dimensions are dynamic and match any size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorSpec {
    /// Tensor name as declared by the model.
    pub name: String,
    /// Declared shape, `-1` for dynamic dimensions.
    pub shape: Vec<i64>,
    /// Element type, e.g. `Float32`.
    pub element_type: String,
}

impl TensorSpec {
    /// Create a tensor descriptor.
    pub fn new(name: impl Into<String>, shape: Vec<i64>, element_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            element_type: element_type.into(),
        }
    }

    /// Whether a concrete shape fits this descriptor.
    pub fn accepts(&self, shape: &[usize]) -> bool {
        self.shape.len() == shape.len()
            && self
                .shape
                .iter()
                .zip(shape)
                .all(|(&declared, &actual)| usize::try_from(declared).map_or(true, |d| d == actual))
    }

    /// Number of elements in the last dimension, if it is fixed.
    pub fn width(&self) -> Option<usize> {
        self.shape
            .last()
            .and_then(|&d| usize::try_from(d).ok())
    }
}

impl fmt::Display for TensorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .shape
            .iter()
            .map(|d| if *d < 0 { "?".to_string() } else { d.to_string() })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{dims}] {}", self.name, self.element_type)
    }
}

/// A model that maps an image tensor to one score per class.
///
/// Implementations must not mutate weights between calls: the same tensor
/// always yields the same scores.
pub trait ScoreModel: Send + Sync {
    /// Declared input descriptor.
    fn input(&self) -> &TensorSpec;

    /// Declared output descriptor.
    fn output(&self) -> &TensorSpec;

    /// Run one forward pass and return the raw output vector.
    fn scores(&self, tensor: &ImageTensor) -> Result<Vec<f32>>;
}

/// Loaded classifier, shared read-only for the lifetime of the process.
pub struct ClassifierHandle {
    model: Box<dyn ScoreModel>,
    source: PathBuf,
}

impl ClassifierHandle {
    /// Wrap a loaded model, checking that its declared tensors fit the
    /// 224x224 RGB input and the species catalog.
    pub fn new(model: Box<dyn ScoreModel>, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();

        if !model.input().accepts(&input::SHAPE) {
            return Err(Error::ModelLoad {
                path: source,
                reason: format!(
                    "model input {} is not compatible with shape {:?}",
                    model.input(),
                    input::SHAPE
                ),
            });
        }

        if let Some(width) = model.output().width()
            && width != SPECIES_COUNT
        {
            return Err(Error::ModelLoad {
                path: source,
                reason: format!(
                    "model output {} has {width} classes, expected {SPECIES_COUNT}",
                    model.output()
                ),
            });
        }

        Ok(Self { model, source })
    }

    /// Declared input descriptor.
    pub fn input(&self) -> &TensorSpec {
        self.model.input()
    }

    /// Declared output descriptor.
    pub fn output(&self) -> &TensorSpec {
        self.model.output()
    }

    /// Where the model was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub(crate) fn scores(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        self.model.scores(tensor)
    }
}

impl fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("source", &self.source)
            .field("input", self.input())
            .field("output", self.output())
            .finish_non_exhaustive()
    }
}
