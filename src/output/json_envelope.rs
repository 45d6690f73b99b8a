//! JSON envelope types for CLI output.
//!
//! Every command run with `--output-mode json` prints exactly one envelope
//! so scripts can consume results without scraping text.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Envelope format version.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Final result.
    Result,
    /// Error occurred.
    Error,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Batch image classification.
    Classification,
    /// Species label table.
    SpeciesList,
    /// Configuration display.
    Config,
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// The command cannot continue.
    Fatal,
    /// A single input failed; the rest were processed.
    Warning,
}

/// Error payload for error events.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Error code (`snake_case` identifier).
    pub code: String,
    /// Error severity.
    pub severity: ErrorSeverity,
    /// Human-readable error message.
    pub message: String,
    /// Suggested action to resolve the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorPayload {
    /// Fatal payload for an error that aborted the command.
    pub fn fatal(error: &Error) -> Self {
        Self {
            code: error.code().to_string(),
            severity: ErrorSeverity::Fatal,
            message: error.to_string(),
            suggestion: suggestion_for(error),
        }
    }
}

fn suggestion_for(error: &Error) -> Option<String> {
    match error {
        Error::ModelLoad { .. } => Some(
            "check --model-path (or AVES_MODEL_PATH) points to the exported ONNX classifier"
                .to_string(),
        ),
        Error::UnsupportedImage { .. } => Some("use a JPEG or PNG image".to_string()),
        Error::NoValidImageFiles => Some("pass .jpg, .jpeg or .png files or directories".to_string()),
        Error::ConfigParse { .. } | Error::ConfigValidation { .. } => {
            Some("run 'aves config show' to inspect the active configuration".to_string())
        }
        _ => None,
    }
}

/// Per-file classification outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FileClassification {
    /// Input file.
    pub path: PathBuf,
    /// Predicted class index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_index: Option<usize>,
    /// Predicted species name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    /// Confidence in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Error for files that could not be classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

/// Payload for batch classification result.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Model artifact used.
    pub model: PathBuf,
    /// Number of files classified successfully.
    pub classified: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Outcome per input file, in processing order.
    pub files: Vec<FileClassification>,
}

/// Payload for configuration display.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents (as JSON value for flexibility).
    pub config: serde_json::Value,
}

/// Payload for species list result.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Number of species.
    pub species_count: usize,
    /// Species in class-index order.
    pub species: Vec<SpeciesEntry>,
}

/// A single species entry.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesEntry {
    /// Class index.
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Description shown with a result.
    pub description: String,
}

/// Emit a JSON result event to stdout.
pub fn emit_json_result<T: Serialize>(payload: &T) {
    emit(EventType::Result, payload);
}

/// Emit a JSON error event to stdout.
pub fn emit_json_error(error: &Error) {
    emit(EventType::Error, &ErrorPayload::fatal(error));
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn emit<T: Serialize>(event: EventType, payload: &T) {
    let envelope = JsonEnvelope::new(event, payload);
    match serde_json::to_string(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize JSON output: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialization() {
        let payload = SpeciesListPayload {
            result_type: ResultType::SpeciesList,
            species_count: 1,
            species: vec![SpeciesEntry {
                index: 9,
                name: "PAVITO MIGRATORIO".to_string(),
                description: "El Pavito Migratorio".to_string(),
            }],
        };
        let envelope = JsonEnvelope::new(EventType::Result, payload);

        let json = serde_json::to_string(&envelope).expect("serialize");
        assert!(json.contains("\"spec_version\":\"1.0\""));
        assert!(json.contains("\"event\":\"result\""));
        assert!(json.contains("\"result_type\":\"species_list\""));
        assert!(json.contains("\"PAVITO MIGRATORIO\""));
    }

    #[test]
    fn test_error_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorSeverity::Fatal).expect("serialize"),
            "\"fatal\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorSeverity::Warning).expect("serialize"),
            "\"warning\""
        );
    }

    #[test]
    fn test_fatal_payload_carries_code_and_suggestion() {
        let payload = ErrorPayload::fatal(&Error::ModelLoad {
            path: PathBuf::from("m.onnx"),
            reason: "missing".to_string(),
        });
        assert_eq!(payload.code, "model_load");
        assert_eq!(payload.severity, ErrorSeverity::Fatal);
        assert!(payload.message.contains("m.onnx"));
        assert!(payload.suggestion.is_some());

        let json = serde_json::to_string(&ErrorPayload::fatal(&Error::Internal {
            message: "x".to_string(),
        }))
        .expect("serialize");
        assert!(!json.contains("suggestion"));
    }

    #[test]
    fn test_failed_file_omits_prediction_fields() {
        let entry = FileClassification {
            path: PathBuf::from("a.png"),
            class_index: None,
            species: None,
            confidence: None,
            error: Some(ErrorPayload {
                code: "unsupported_image".to_string(),
                severity: ErrorSeverity::Warning,
                message: "bad".to_string(),
                suggestion: None,
            }),
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(!json.contains("class_index"));
        assert!(json.contains("\"warning\""));
    }
}
