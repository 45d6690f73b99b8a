//! Page state and the data each state displays.

use crate::catalog;
use crate::constants::{confidence, page};
use crate::inference::PredictionResult;
use crate::web::chart::SimulatedAccuracy;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use rand::Rng;

/// What the page currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    /// No image analyzed yet, or the last upload was rejected.
    Idle {
        /// Message explaining why the last upload produced no result.
        notice: Option<Notice>,
    },
    /// An image was classified.
    Result(Box<ResultView>),
}

impl PageState {
    /// Fresh page with the upload prompt.
    pub const fn idle() -> Self {
        Self::Idle { notice: None }
    }

    /// Idle page explaining a rejected upload.
    pub const fn rejected(notice: Notice) -> Self {
        Self::Idle {
            notice: Some(notice),
        }
    }

    /// Whether a result block is displayed.
    pub const fn is_result(&self) -> bool {
        matches!(self, Self::Result(_))
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The user can fix it by uploading another file.
    Warning,
    /// Something failed on our side.
    Error,
}

/// Message shown in place of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: &'static str,
}

impl Notice {
    /// The upload was not a readable JPEG/PNG.
    pub const fn unsupported_image() -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: page::UNSUPPORTED_IMAGE,
        }
    }

    /// The upload exceeded the body limit.
    pub const fn upload_too_large() -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: page::UPLOAD_TOO_LARGE,
        }
    }

    /// Inference failed.
    pub const fn analysis_failed() -> Self {
        Self {
            level: NoticeLevel::Error,
            message: page::ANALYSIS_FAILED,
        }
    }
}

/// Uploaded image echoed back as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    mime: &'static str,
    data: String,
}

impl ImagePreview {
    /// Encode uploaded bytes for inline display.
    pub fn new(bytes: &[u8], format: ImageFormat) -> Self {
        Self {
            mime: format.to_mime_type(),
            data: STANDARD.encode(bytes),
        }
    }

    /// `data:` URI for an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }
}

/// Horizontal bar proportional to the confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBar {
    confidence: f32,
}

impl ConfidenceBar {
    /// Bar for a confidence in [0, 1].
    pub fn new(value: f32) -> Self {
        Self {
            confidence: value.clamp(confidence::MIN, confidence::MAX),
        }
    }

    /// CSS width of the bar in percent.
    pub fn width_percent(&self) -> f32 {
        self.confidence * 100.0
    }

    /// Label such as `88.00%`.
    pub fn label(&self) -> String {
        format!(
            "{:.*}%",
            confidence::PERCENT_DECIMAL_PLACES,
            self.width_percent()
        )
    }
}

/// Everything the result block displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// Uploaded image.
    pub image: ImagePreview,
    /// Predicted species name.
    pub species: &'static str,
    /// Confidence bar, absent when the user hid it.
    pub confidence: Option<ConfidenceBar>,
    /// Species description.
    pub description: &'static str,
    /// Illustrative per-class values for the chart.
    pub accuracy: SimulatedAccuracy,
}

impl ResultView {
    /// Build the result block for a prediction.
    pub fn new<R: Rng + ?Sized>(
        image: ImagePreview,
        prediction: &PredictionResult,
        show_confidence: bool,
        rng: &mut R,
    ) -> Self {
        Self {
            image,
            species: prediction.species_name(),
            confidence: show_confidence.then(|| ConfidenceBar::new(prediction.confidence)),
            description: catalog::description(prediction.class_index),
            accuracy: SimulatedAccuracy::sample(rng, catalog::SPECIES_COUNT),
        }
    }
}
