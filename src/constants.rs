//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "aves";

/// Default location of the classifier artifact, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/modelo_convertido.onnx";

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Default upper bound for an uploaded image body (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Model input geometry (NHWC).
pub mod input {
    /// Batch dimension.
    pub const BATCH: usize = 1;
    /// Input height in pixels.
    pub const HEIGHT: usize = 224;
    /// Input width in pixels.
    pub const WIDTH: usize = 224;
    /// Color channels (RGB).
    pub const CHANNELS: usize = 3;
    /// Full input shape.
    pub const SHAPE: [usize; 4] = [BATCH, HEIGHT, WIDTH, CHANNELS];
    /// Divisor mapping `u8` pixel values to [0, 1].
    pub const PIXEL_SCALE: f32 = 255.0;
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
    /// Decimal places for percentage display.
    pub const PERCENT_DECIMAL_PLACES: usize = 2;
}

/// Simulated per-class accuracy chart.
pub mod accuracy {
    /// Lower bound of the simulated values.
    pub const MIN: f64 = 0.70;
    /// Upper bound of the simulated values.
    pub const MAX: f64 = 0.95;
    /// Chart title.
    pub const TITLE: &str = "Precisión estimada por clase";
    /// X-axis label.
    pub const X_LABEL: &str = "Precisión";
    /// Disclaimer shown under the chart.
    pub const DISCLAIMER: &str =
        "Valores simulados con fines ilustrativos; no corresponden a una evaluación real del modelo.";
    /// Bar color as RGB.
    pub const BAR_RGB: (u8, u8, u8) = (0x6e, 0x8e, 0xfb);
    /// Chart size in pixels.
    pub const SIZE: (u32, u32) = (680, 360);
}

/// Web page text and layout.
pub mod page {
    /// Page title.
    pub const TITLE: &str = "Clasificador de Aves";
    /// Subtitle under the header.
    pub const SUBTITLE: &str = "Identificación de especies mediante inteligencia artificial";
    /// Width of the uploaded image preview in pixels.
    pub const PREVIEW_WIDTH_PX: u32 = 350;
    /// Prompt shown in the Idle state.
    pub const IDLE_PROMPT: &str =
        "Por favor, sube una imagen de un ave para comenzar el análisis.";
    /// Shown when an upload cannot be decoded.
    pub const UNSUPPORTED_IMAGE: &str =
        "No se pudo leer la imagen. Sube un archivo JPG o PNG válido.";
    /// Shown when inference fails.
    pub const ANALYSIS_FAILED: &str =
        "No se pudo analizar la imagen. Inténtalo de nuevo más tarde.";
    /// Shown when an upload exceeds the body limit.
    pub const UPLOAD_TOO_LARGE: &str =
        "La imagen es demasiado grande. Sube un archivo más pequeño.";
    /// Sidebar checkbox label.
    pub const SHOW_CONFIDENCE_LABEL: &str = "Mostrar barra de confianza";
    /// Sidebar "about" text.
    pub const ABOUT: &str = "Esta aplicación utiliza un modelo de aprendizaje profundo para clasificar imágenes de aves en 10 categorías diferentes.";
    /// Accepted upload types for the file input.
    pub const ACCEPTED_TYPES: &str = ".jpg,.jpeg,.png,image/jpeg,image/png";
}

/// Supported image file extensions for batch classification.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
