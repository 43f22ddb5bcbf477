//! Tensor types shared across the detection pipeline.

use ndarray::Array4;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 4D `f32` tensor in NHWC layout, the pipeline's model input type.
pub type Tensor4D = Array4<f32>;

/// Counts the tensors currently alive in a pipeline.
///
/// Every tracked [`ImageTensor`] increments the gauge on creation and
/// decrements it on drop, making the release guarantee of the pipeline
/// observable: after an analysis finishes, the gauge reads zero.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct TensorGauge {
    live: Arc<AtomicUsize>,
}

impl TensorGauge {
    /// Creates a gauge with no live tensors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked tensors currently alive.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    fn acquire(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}

/// An owned model-input tensor.
///
/// The tensor is released when the value drops; a tracked tensor also
/// reports its lifetime through a [`TensorGauge`]. Not clonable: each
/// prepared input has exactly one owner, the invocation that created it.
pub struct ImageTensor {
    data: Tensor4D,
    gauge: Option<TensorGauge>,
}

impl ImageTensor {
    /// Wraps a tensor and registers it with the gauge.
    pub fn tracked(data: Tensor4D, gauge: &TensorGauge) -> Self {
        gauge.acquire();
        Self {
            data,
            gauge: Some(gauge.clone()),
        }
    }

    /// Wraps a tensor without gauge tracking.
    pub fn untracked(data: Tensor4D) -> Self {
        Self { data, gauge: None }
    }

    /// The underlying NHWC array.
    pub fn array(&self) -> &Tensor4D {
        &self.data
    }

    /// The tensor shape, `[batch, height, width, channels]`.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

impl std::fmt::Debug for ImageTensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageTensor")
            .field("shape", &self.data.shape())
            .field("tracked", &self.gauge.is_some())
            .finish()
    }
}

impl Drop for ImageTensor {
    fn drop(&mut self) {
        if let Some(gauge) = &self.gauge {
            gauge.release();
        }
    }
}

/// Raw model output: the reported shape plus the flattened values.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    /// Output dimensions as reported by the backend.
    pub shape: Vec<usize>,
    /// Flattened output values.
    pub data: Vec<f32>,
}

impl OutputTensor {
    /// Creates an output tensor from a shape and flattened values.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Self {
        Self { shape, data }
    }

    /// Number of values in the output.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the output holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros() -> Tensor4D {
        Array4::zeros((1, 2, 2, 3))
    }

    #[test]
    fn gauge_tracks_tensor_lifetime() {
        let gauge = TensorGauge::new();
        assert_eq!(gauge.live(), 0);

        let first = ImageTensor::tracked(zeros(), &gauge);
        let second = ImageTensor::tracked(zeros(), &gauge);
        assert_eq!(gauge.live(), 2);

        drop(first);
        assert_eq!(gauge.live(), 1);
        drop(second);
        assert_eq!(gauge.live(), 0);
    }

    #[test]
    fn untracked_tensor_does_not_touch_gauge() {
        let gauge = TensorGauge::new();
        let tensor = ImageTensor::untracked(zeros());
        assert_eq!(gauge.live(), 0);
        drop(tensor);
        assert_eq!(gauge.live(), 0);
    }

    #[test]
    fn shape_reports_nhwc_dimensions() {
        let tensor = ImageTensor::untracked(Array4::zeros((1, 224, 224, 3)));
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn output_tensor_length_matches_data() {
        let output = OutputTensor::new(vec![1, 2], vec![0.1, 0.9]);
        assert_eq!(output.len(), 2);
        assert!(!output.is_empty());
        assert!(OutputTensor::new(vec![1, 0], vec![]).is_empty());
    }
}
