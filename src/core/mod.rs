//! The core module of the detection pipeline.
//!
//! This module contains the fundamental components of the pipeline, including:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - Inference backend integration
//! - Input and tensor types
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod input;
pub mod tensor;

pub use config::{DetectorConfig, GraphOptLevel, OnnxSessionConfig};
pub use constants::*;
pub use errors::{DetectorError, DetectorResult};
pub use inference::{DetectionModel, OnnxDetectionModel};
pub use input::ImageInput;
pub use tensor::{ImageTensor, OutputTensor, Tensor4D, TensorGauge};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
