//! Image decoding and tensor preparation.

use crate::constants::input;
use crate::error::{Error, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat};
use ndarray::Array4;

#[allow(clippy::cast_possible_truncation)]
const TARGET_WIDTH: u32 = input::WIDTH as u32;
#[allow(clippy::cast_possible_truncation)]
const TARGET_HEIGHT: u32 = input::HEIGHT as u32;

/// Normalized NHWC model input of shape (1, 224, 224, 3), values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    /// Wrap an already prepared array.
    pub fn new(data: Array4<f32>) -> Self {
        Self { data }
    }

    /// Tensor shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    /// Copy the values out in row-major order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }
}

fn unsupported(reason: impl Into<String>) -> Error {
    Error::UnsupportedImage {
        reason: reason.into(),
    }
}

/// Identify the container format, accepting only JPEG and PNG.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat> {
    if bytes.is_empty() {
        return Err(unsupported("empty upload"));
    }

    let format = image::guess_format(bytes).map_err(|e| unsupported(e.to_string()))?;
    match format {
        ImageFormat::Jpeg | ImageFormat::Png => Ok(format),
        other => Err(unsupported(format!(
            "{other:?} images are not accepted, use JPEG or PNG"
        ))),
    }
}

/// Decode uploaded bytes into an image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let format = detect_format(bytes)?;
    image::load_from_memory_with_format(bytes, format).map_err(|e| unsupported(e.to_string()))
}

/// Convert a decoded image into the model input tensor.
///
/// Converts to RGB, resizes to 224x224 and scales every channel by 1/255.
pub fn to_tensor(image: &DynamicImage) -> Result<ImageTensor> {
    if image.width() == 0 || image.height() == 0 {
        return Err(unsupported(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    if image.color().channel_count() == 0 {
        return Err(unsupported("image has no color channels"));
    }

    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, TARGET_WIDTH, TARGET_HEIGHT, FilterType::CatmullRom);

    // RgbImage raw layout is row-major HWC, which is exactly NHWC with batch 1.
    let values = resized
        .as_raw()
        .iter()
        .map(|&v| f32::from(v) / input::PIXEL_SCALE)
        .collect::<Vec<_>>();

    let data = Array4::from_shape_vec(input::SHAPE, values).map_err(|e| Error::Internal {
        message: format!("resized image does not fill the input tensor: {e}"),
    })?;

    Ok(ImageTensor::new(data))
}

/// Decode uploaded bytes and prepare the model input tensor.
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor> {
    let image = decode(bytes)?;
    to_tensor(&image)
}
