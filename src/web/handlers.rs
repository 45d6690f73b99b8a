//! HTTP handlers.

use crate::catalog::{self, Species};
use crate::error::{Error, Result};
use crate::inference::{PredictionResult, detect_format};
use crate::pipeline::analyze_image;
use crate::web::AppState;
use crate::web::page;
use crate::web::view::{ImagePreview, Notice, PageState, ResultView};
use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use image::ImageFormat;
use serde::Serialize;
use tracing::{error, info, warn};

/// Form field carrying the image.
const IMAGE_FIELD: &str = "image";
/// Form field carrying the confidence toggle.
const SHOW_CONFIDENCE_FIELD: &str = "show_confidence";

/// Parsed upload form.
#[derive(Debug)]
struct Upload {
    bytes: Bytes,
    show_confidence: bool,
}

impl Upload {
    /// Read the multipart body.
    ///
    /// An unchecked checkbox is omitted by browsers, so a missing
    /// `show_confidence` field means the bar is hidden.
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut bytes = None;
        let mut show_confidence = false;

        while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(IMAGE_FIELD) => {
                    bytes = Some(field.bytes().await.map_err(upload_error)?);
                }
                Some(SHOW_CONFIDENCE_FIELD) => {
                    let value = field.text().await.map_err(upload_error)?;
                    show_confidence = matches!(value.as_str(), "on" | "true" | "1");
                }
                _ => {}
            }
        }

        let bytes = bytes
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::UnsupportedImage {
                reason: "no image uploaded".to_string(),
            })?;

        Ok(Self {
            bytes,
            show_confidence,
        })
    }
}

/// Map a body read failure, keeping the body limit distinct from bad input.
fn upload_error(error: MultipartError) -> Error {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::UploadTooLarge {
            reason: error.body_text(),
        }
    } else {
        Error::UnsupportedImage {
            reason: error.body_text(),
        }
    }
}

/// Run the CPU-bound part of a request off the async runtime.
async fn analyze(state: &AppState, bytes: Bytes) -> Result<(PredictionResult, ImageFormat)> {
    let handle = state.handle.clone();
    tokio::task::spawn_blocking(move || {
        let format = detect_format(&bytes)?;
        let prediction = analyze_image(&handle, &bytes)?;
        Ok((prediction, format))
    })
    .await
    .map_err(|e| Error::Inference {
        reason: format!("analysis task failed: {e}"),
    })?
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::UnsupportedImage { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(error: &Error) {
    if matches!(
        error,
        Error::UnsupportedImage { .. } | Error::UploadTooLarge { .. }
    ) {
        warn!("Rejected upload: {error}");
    } else {
        error!("Analysis failed: {error}");
    }
}

fn notice_for(error: &Error) -> Notice {
    match error {
        Error::UnsupportedImage { .. } => Notice::unsupported_image(),
        Error::UploadTooLarge { .. } => Notice::upload_too_large(),
        _ => Notice::analysis_failed(),
    }
}

/// `GET /`: the Idle page.
#[allow(clippy::unused_async)]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    page::render(&PageState::idle(), state.show_confidence).map(Html)
}

/// `POST /classify`: classify an uploaded image and render the result page.
///
/// The checkbox keeps the submitted choice whenever the form could be read.
pub async fn classify_page(State(state): State<AppState>, multipart: Multipart) -> Response {
    let (show_confidence, analyzed) = match Upload::read(multipart).await {
        Ok(upload) => (upload.show_confidence, result_state(&state, upload).await),
        Err(e) => (state.show_confidence, Err(e)),
    };

    let (status, page_state) = match analyzed {
        Ok(page_state) => (StatusCode::OK, page_state),
        Err(e) => {
            log_failure(&e);
            (status_for(&e), PageState::rejected(notice_for(&e)))
        }
    };

    match page::render(&page_state, show_confidence) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn result_state(state: &AppState, upload: Upload) -> Result<PageState> {
    let (prediction, format) = analyze(state, upload.bytes.clone()).await?;
    info!(
        "Classified upload as {} ({:.2}%)",
        prediction.species_name(),
        prediction.confidence_percent()
    );
    let view = ResultView::new(
        ImagePreview::new(&upload.bytes, format),
        &prediction,
        upload.show_confidence,
        &mut rand::thread_rng(),
    );
    Ok(PageState::Result(Box::new(view)))
}

/// JSON body for a successful classification.
#[derive(Debug, Serialize)]
pub struct ClassificationBody {
    /// Predicted class index.
    pub class_index: usize,
    /// Species name.
    pub species: &'static str,
    /// Confidence in [0, 1].
    pub confidence: f32,
    /// Confidence as a percentage.
    pub confidence_percent: f32,
    /// Species description.
    pub description: &'static str,
}

impl From<PredictionResult> for ClassificationBody {
    fn from(prediction: PredictionResult) -> Self {
        Self {
            class_index: prediction.class_index,
            species: prediction.species_name(),
            confidence: prediction.confidence,
            confidence_percent: prediction.confidence_percent(),
            description: prediction.description(),
        }
    }
}

/// JSON body for a failed request.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Stable error identifier.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        log_failure(&self);
        let body = ApiError {
            code: self.code(),
            message: self.to_string(),
        };
        (status_for(&self), Json(body)).into_response()
    }
}

/// `POST /api/classify`: classify an uploaded image and return JSON.
pub async fn classify_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassificationBody>> {
    let upload = Upload::read(multipart).await?;
    let (prediction, _) = analyze(&state, upload.bytes).await?;
    Ok(Json(prediction.into()))
}

/// `GET /api/species`: the label table.
#[allow(clippy::unused_async)]
pub async fn species() -> Json<&'static [Species]> {
    Json(&catalog::SPECIES)
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `ok` when the server answers.
    pub status: &'static str,
    /// Model artifact in use.
    pub model: String,
    /// Number of classes.
    pub classes: usize,
}

/// `GET /health`: liveness and the loaded model.
#[allow(clippy::unused_async)]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        model: state.handle.source().display().to_string(),
        classes: catalog::SPECIES_COUNT,
    })
}
