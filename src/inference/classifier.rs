//! Forward pass and top-class extraction.

use crate::catalog::{self, SPECIES_COUNT};
use crate::constants::confidence;
use crate::error::{Error, Result};
use crate::inference::ImageTensor;
use crate::inference::model::ClassifierHandle;
use serde::Serialize;

/// Top prediction for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Index of the winning class, always within the species catalog.
    pub class_index: usize,
    /// Score of the winning class as a probability in [0, 1].
    pub confidence: f32,
}

impl PredictionResult {
    /// Catalog name of the predicted species.
    pub fn species_name(&self) -> &'static str {
        catalog::species_name(self.class_index).unwrap_or("?")
    }

    /// Catalog description of the predicted species.
    pub fn description(&self) -> &'static str {
        catalog::description(self.class_index)
    }

    /// Confidence scaled to a percentage.
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

/// Run the model on a prepared tensor and pick the top class.
pub fn classify(handle: &ClassifierHandle, tensor: &ImageTensor) -> Result<PredictionResult> {
    if !handle.input().accepts(tensor.shape()) {
        return Err(Error::Inference {
            reason: format!(
                "tensor shape {:?} does not match model input {}",
                tensor.shape(),
                handle.input()
            ),
        });
    }

    let scores = handle.scores(tensor)?;
    if scores.len() != SPECIES_COUNT {
        return Err(Error::Inference {
            reason: format!(
                "model returned {} scores, expected {SPECIES_COUNT}",
                scores.len()
            ),
        });
    }

    prediction_from_scores(&scores)
}

/// Position and value of the largest score, first occurrence on ties.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (index, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((index, score)),
        })
}

/// Turn a raw output vector into a prediction.
///
/// Scores already in [0, 1] are read as probabilities. Anything else is
/// treated as logits and the winning score goes through softmax.
pub fn prediction_from_scores(scores: &[f32]) -> Result<PredictionResult> {
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(Error::Inference {
            reason: format!("model returned a non-finite score ({bad})"),
        });
    }

    let (class_index, top) = argmax(scores).ok_or_else(|| Error::Inference {
        reason: "model returned an empty score vector".to_string(),
    })?;

    let probabilities = scores
        .iter()
        .all(|s| (confidence::MIN..=confidence::MAX).contains(s));

    let confidence = if probabilities {
        top
    } else {
        let total: f32 = scores.iter().map(|s| (s - top).exp()).sum();
        (1.0 / total).clamp(confidence::MIN, confidence::MAX)
    };

    Ok(PredictionResult {
        class_index,
        confidence,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::inference::testing::FixedScores;
    use ndarray::Array4;

    const PAVITO_SCORES: [f32; 10] = [0.01, 0.02, 0.01, 0.01, 0.02, 0.01, 0.01, 0.01, 0.02, 0.88];

    fn blank_tensor() -> ImageTensor {
        ImageTensor::new(Array4::zeros((1, 224, 224, 3)))
    }

    #[test]
    fn test_argmax_first_occurrence_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5, 0.1]), Some((1, 0.5)));
        assert_eq!(argmax(&[0.3, 0.3, 0.3]), Some((0, 0.3)));
        assert_eq!(argmax(&[-3.0, -1.0, -2.0]), Some((1, -1.0)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_pavito_migratorio_scenario() {
        let handle = FixedScores::handle(PAVITO_SCORES.to_vec());
        let prediction = classify(&handle, &blank_tensor()).unwrap();

        assert_eq!(prediction.class_index, 9);
        assert!((prediction.confidence - 0.88).abs() < 1e-6);
        assert_eq!(prediction.species_name(), "PAVITO MIGRATORIO");
        assert!((prediction.confidence_percent() - 88.0).abs() < 1e-4);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let handle = FixedScores::handle(PAVITO_SCORES.to_vec());
        let tensor = blank_tensor();
        let first = classify(&handle, &tensor).unwrap();
        let second = classify(&handle, &tensor).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_shape_mismatch_is_inference_error() {
        let handle = FixedScores::handle(PAVITO_SCORES.to_vec());
        let tensor = ImageTensor::new(Array4::zeros((1, 3, 224, 224)));
        let result = classify(&handle, &tensor);
        assert!(matches!(result, Err(Error::Inference { .. })));
    }

    #[test]
    fn test_wrong_output_width_is_inference_error() {
        let handle = FixedScores::handle(vec![0.5; 7]);
        let result = classify(&handle, &blank_tensor());
        assert!(matches!(result, Err(Error::Inference { .. })));
    }

    #[test]
    fn test_nan_score_is_inference_error() {
        let mut scores = PAVITO_SCORES.to_vec();
        scores[3] = f32::NAN;
        assert!(prediction_from_scores(&scores).is_err());
    }

    #[test]
    fn test_logits_are_softmaxed() {
        let logits = [1.0, 2.0, 5.0, -4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0];
        let prediction = prediction_from_scores(&logits).unwrap();

        let expected = 1.0 / logits.iter().map(|l: &f32| (l - 5.0).exp()).sum::<f32>();
        assert_eq!(prediction.class_index, 2);
        assert!((prediction.confidence - expected).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }

    #[test]
    fn test_probabilities_are_kept_as_is() {
        let prediction = prediction_from_scores(&[0.1, 0.6, 0.3]).unwrap();
        assert_eq!(prediction.class_index, 1);
        assert_eq!(prediction.confidence, 0.6);
    }

    #[test]
    fn test_every_class_index_has_a_name() {
        for index in 0..SPECIES_COUNT {
            let mut scores = vec![0.0; SPECIES_COUNT];
            scores[index] = 1.0;
            let prediction = prediction_from_scores(&scores).unwrap();
            assert_eq!(prediction.class_index, index);
            assert!(!prediction.species_name().is_empty());
            assert_ne!(prediction.species_name(), "?");
        }
    }
}
