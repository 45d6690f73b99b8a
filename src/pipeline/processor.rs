//! Single image processing pipeline.

use crate::error::{Error, Result};
use crate::inference::{ClassifierHandle, PredictionResult, classify, preprocess};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Preprocess uploaded bytes and classify them.
pub fn analyze_image(handle: &ClassifierHandle, bytes: &[u8]) -> Result<PredictionResult> {
    let start = Instant::now();

    let tensor = preprocess(bytes)?;
    let prediction = classify(handle, &tensor)?;

    debug!(
        "Classified {} bytes as {} ({:.4}) in {:.1}ms",
        bytes.len(),
        prediction.species_name(),
        prediction.confidence,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(prediction)
}

/// Read an image file and classify it.
pub fn process_file(path: &Path, handle: &ClassifierHandle) -> Result<PredictionResult> {
    debug!("Processing: {}", path.display());

    let bytes = std::fs::read(path).map_err(|e| Error::UnsupportedImage {
        reason: format!("cannot read '{}': {e}", path.display()),
    })?;

    analyze_image(handle, &bytes)
}
