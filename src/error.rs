//! Error types for aves.

/// Result type alias for aves operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for aves.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// The classifier artifact could not be opened.
    ///
    /// Fatal: no request can be served without a model.
    #[error("failed to load model '{path}': {reason}")]
    ModelLoad {
        /// Path to the model file.
        path: std::path::PathBuf,
        /// Description of the load failure.
        reason: String,
    },

    /// The uploaded bytes are not a usable JPEG/PNG image.
    #[error("unsupported image: {reason}")]
    UnsupportedImage {
        /// Description of why the image was rejected.
        reason: String,
    },

    /// The upload exceeded the configured body limit.
    #[error("upload too large: {reason}")]
    UploadTooLarge {
        /// Description from the body reader.
        reason: String,
    },

    /// Inference failed.
    #[error("inference failed: {reason}")]
    Inference {
        /// Description of the inference failure.
        reason: String,
    },

    /// The page or the chart could not be rendered.
    #[error("failed to render {what}: {reason}")]
    Render {
        /// What was being rendered.
        what: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// No valid image files found.
    #[error("no valid image files found in the provided paths")]
    NoValidImageFiles,

    /// Failed to bind the HTTP listener.
    #[error("failed to bind HTTP listener to {addr}")]
    ServerBind {
        /// Address that could not be bound.
        addr: std::net::SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// HTTP server terminated with an error.
    #[error("HTTP server error")]
    Server {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write CSV report.
    #[error("failed to write CSV report '{path}'")]
    CsvWrite {
        /// Path to the CSV file.
        path: std::path::PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// Internal error (for unexpected failures).
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Stable `snake_case` identifier used in JSON output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::ConfigDirNotFound => "config_dir_not_found",
            Self::ConfigRead { .. } => "config_read",
            Self::ConfigParse { .. } => "config_parse",
            Self::ConfigWrite { .. } => "config_write",
            Self::ConfigSerialize { .. } => "config_serialize",
            Self::ConfigValidation { .. } => "config_validation",
            Self::ModelLoad { .. } => "model_load",
            Self::UnsupportedImage { .. } => "unsupported_image",
            Self::UploadTooLarge { .. } => "upload_too_large",
            Self::Inference { .. } => "inference",
            Self::Render { .. } => "render",
            Self::NoValidImageFiles => "no_valid_image_files",
            Self::ServerBind { .. } => "server_bind",
            Self::Server { .. } => "server",
            Self::CsvWrite { .. } => "csv_write",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether the user can recover by submitting a different image.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedImage { .. } | Self::UploadTooLarge { .. } | Self::Inference { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_snake_case() {
        let errors = [
            Error::UnsupportedImage {
                reason: "empty".to_string(),
            },
            Error::Inference {
                reason: "shape".to_string(),
            },
            Error::ModelLoad {
                path: "m.onnx".into(),
                reason: "missing".to_string(),
            },
            Error::UploadTooLarge {
                reason: "length limit exceeded".to_string(),
            },
            Error::Render {
                what: "chart",
                reason: "font".to_string(),
            },
            Error::NoValidImageFiles,
        ];

        for error in &errors {
            let code = error.code();
            assert!(
                code.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "code '{code}' is not snake_case"
            );
        }
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(
            Error::UnsupportedImage {
                reason: String::new()
            }
            .is_recoverable()
        );
        assert!(
            Error::Inference {
                reason: String::new()
            }
            .is_recoverable()
        );
        assert!(
            !Error::ModelLoad {
                path: "m.onnx".into(),
                reason: String::new(),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_model_load_message_includes_path() {
        let error = Error::ModelLoad {
            path: "models/modelo_convertido.onnx".into(),
            reason: "file does not exist".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("models/modelo_convertido.onnx"));
        assert!(message.contains("file does not exist"));
    }
}
