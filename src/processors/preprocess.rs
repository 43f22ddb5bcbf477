//! Image decoding and input tensor preparation.

use crate::core::constants::{DEFAULT_TARGET_SIZE, PIXEL_SCALE};
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::tensor::{ImageTensor, TensorGauge};
use image::imageops::FilterType;
use ndarray::Array4;
use tracing::debug;

/// Decodes raw image bytes and prepares the model input tensor.
///
/// The output is always `[1, H, W, 3]` in NHWC layout, channels in RGB
/// order, with f32 values scaled to `[0, 1]`. Images are resized to the
/// target size with nearest-neighbor sampling and no cropping, so the full
/// frame is kept at the cost of aspect-ratio distortion on non-square
/// inputs.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    /// Target size as (height, width).
    target_size: (u32, u32),
    resize_filter: FilterType,
    gauge: TensorGauge,
}

impl ImagePreprocessor {
    /// Creates a preprocessor producing tensors for the default input size.
    ///
    /// Tensors it prepares are tracked by `gauge` until dropped.
    pub fn new(gauge: TensorGauge) -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            resize_filter: FilterType::Nearest,
            gauge,
        }
    }

    /// Sets the target size as (height, width).
    pub fn with_target_size(mut self, size: (u32, u32)) -> Self {
        self.target_size = size;
        self
    }

    /// Returns the target size as (height, width).
    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    /// Decodes `bytes` and returns the ready-to-infer input tensor.
    ///
    /// Intermediate decode and resize buffers are dropped as soon as the
    /// next stage owns its copy, so peak memory stays close to one frame.
    pub fn prepare(&self, bytes: &[u8]) -> DetectorResult<ImageTensor> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DetectorError::decode_error("failed to decode image bytes", e))?;
        let rgb = decoded.to_rgb8();
        drop(decoded);

        let (height, width) = self.target_size;
        let resized = image::imageops::resize(&rgb, width, height, self.resize_filter);
        drop(rgb);

        let data: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|v| f32::from(v) * PIXEL_SCALE)
            .collect();

        let tensor = Array4::from_shape_vec((1, height as usize, width as usize, 3), data)
            .map_err(|e| {
                DetectorError::pipeline_error("resized buffer does not match tensor shape", e)
            })?;

        debug!("Prepared input tensor [1, {}, {}, 3]", height, width);
        Ok(ImageTensor::tracked(tensor, &self.gauge))
    }
}
