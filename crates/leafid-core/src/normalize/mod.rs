//! Classifier input normalization
//!
//! Converts a decoded image into the rank-4 `(batch, height, width, channel)`
//! float tensor the classifier expects. Steps run in a fixed order:
//! force RGB, resize, scale 0-255 to 0.0-1.0, add a batch axis of 1.


use image::{imageops, DynamicImage, Rgb, RgbImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LeafError, Result};

/// Classifier input tensor, laid out NHWC with a batch of one.
pub type Tensor = Array4<f32>;

/// Default classifier input edge, in pixels.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Tolerance above 1.0 still treated as already-normalized data.
const UNIT_RANGE_TOLERANCE: f32 = 1e-4;

/// Resampling filter used for the resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    fn to_filter_type(self) -> imageops::FilterType {
        match self {
            ResizeFilter::Nearest => imageops::FilterType::Nearest,
            ResizeFilter::Triangle => imageops::FilterType::Triangle,
            ResizeFilter::CatmullRom => imageops::FilterType::CatmullRom,
            ResizeFilter::Gaussian => imageops::FilterType::Gaussian,
            ResizeFilter::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Spatial size of the classifier input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub width: u32,
    pub height: u32,
}

impl Default for InputShape {
    fn default() -> Self {
        Self {
            width: DEFAULT_INPUT_SIZE,
            height: DEFAULT_INPUT_SIZE,
        }
    }
}

impl InputShape {
    /// Full tensor dimensions `(1, height, width, 3)`.
    pub fn dims(&self) -> (usize, usize, usize, usize) {
        (1, self.height as usize, self.width as usize, 3)
    }
}

/// Deterministic image-to-tensor conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer {
    shape: InputShape,
    filter: ResizeFilter,
}

impl ImageNormalizer {
    pub fn new(shape: InputShape, filter: ResizeFilter) -> Self {
        Self { shape, filter }
    }

    pub fn shape(&self) -> InputShape {
        self.shape
    }

    pub fn filter(&self) -> ResizeFilter {
        self.filter
    }

    /// Normalize an image to this normalizer's input shape.
    pub fn normalize(&self, image: &DynamicImage) -> Tensor {
        normalize(image, self.shape.width, self.shape.height, self.filter)
    }

    /// Accept a tensor that is already in classifier layout.
    ///
    /// Data already in 0.0-1.0 is passed through untouched so it is never
    /// divided by 255 twice. Data still on the 0-255 scale is rescaled once.
    ///
    /// The scale is inferred from the values, so a 0-255 tensor whose values
    /// are all 0 or 1 (a nearly black image) passes through unscaled. Send
    /// raw pixel data through [`ImageNormalizer::normalize`] instead.
    pub fn conform(&self, tensor: Tensor) -> Result<Tensor> {
        if tensor.dim() != self.shape.dims() {
            return Err(LeafError::Configuration(format!(
                "tensor shape {:?} does not match classifier input {:?}",
                tensor.dim(),
                self.shape.dims()
            )));
        }

        let mut max = f32::NEG_INFINITY;
        let mut min = f32::INFINITY;
        for &v in tensor.iter() {
            if !v.is_finite() {
                return Err(LeafError::InferenceFailed(
                    "input tensor contains non-finite values".to_string(),
                ));
            }
            max = max.max(v);
            min = min.min(v);
        }

        if min < 0.0 {
            return Err(LeafError::InferenceFailed(format!(
                "input tensor has negative values (min {})",
                min
            )));
        }
        if max <= 1.0 + UNIT_RANGE_TOLERANCE {
            return Ok(tensor);
        }
        if max <= 255.0 {
            warn!(max, "Input tensor is on the 0-255 scale; rescaling once");
            return Ok(tensor.mapv(|v| v / 255.0));
        }

        Err(LeafError::InferenceFailed(format!(
            "input tensor values out of range (max {})",
            max
        )))
    }
}

/// Normalize `image` into a `(1, target_height, target_width, 3)` tensor.
pub fn normalize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: ResizeFilter,
) -> Tensor {
    let rgb = image.to_rgb8();

    // Already the right size: skip resampling so the pixels are untouched
    let resized = if rgb.dimensions() == (target_width, target_height) {
        rgb
    } else {
        imageops::resize(&rgb, target_width, target_height, filter.to_filter_type())
    };

    debug!(
        width = target_width,
        height = target_height,
        filter = ?filter,
        "Normalized classifier input"
    );

    Array4::from_shape_fn(
        (1, target_height as usize, target_width as usize, 3),
        |(_, y, x, c)| resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    )
}

/// Turn a normalized tensor back into an 8-bit image (first batch entry).
pub fn tensor_to_image(tensor: &Tensor) -> RgbImage {
    let (_, height, width, _) = tensor.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let px = |c: usize| {
            (tensor[[0, y as usize, x as usize, c]] * 255.0)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb([px(0), px(1), px(2)])
    })
}
