//! Inference backends for detection models.
//!
//! The [`DetectionModel`] trait abstracts over the model runtime so the
//! pipeline can be driven by the ONNX Runtime backend in production and by
//! lightweight stubs in tests. [`OnnxDetectionModel`] is the production
//! implementation, backed by a pool of ONNX Runtime sessions.

pub mod ort_model;
pub mod session;

pub use ort_model::OnnxDetectionModel;
pub use session::{load_session_from_file, load_session_from_memory};

use crate::core::errors::DetectorResult;
use crate::core::tensor::{OutputTensor, Tensor4D};

/// A loaded detection model that maps an image tensor to a raw output tensor.
///
/// Implementations must be safe to share across threads and must not retain
/// any reference to the input tensor after `predict` returns.
pub trait DetectionModel: Send + Sync + std::fmt::Debug {
    /// Runs a forward pass over a `[1, H, W, 3]` input tensor.
    fn predict(&self, input: &Tensor4D) -> DetectorResult<OutputTensor>;

    /// Returns a short name identifying the model, used in logs and errors.
    fn name(&self) -> &str;
}
