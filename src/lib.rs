//! # Deepfake Detector
//!
//! A Rust library for detecting image manipulation with an ONNX
//! classification model. It takes raw image bytes and resolves to a verdict
//! ("authentic" vs "manipulated") with a confidence score and a set of
//! labeled auxiliary metrics.
//!
//! ## Features
//!
//! - Complete analysis pipeline from image bytes to verdict
//! - Lazy model loading with per-locator caching and request coalescing
//! - Local file and HTTP(S) model artifact sources
//! - Explicit lifecycle: one analysis at a time, every tensor released
//!   before the run resolves
//! - ONNX Runtime integration for fast inference
//!
//! ## Components
//!
//! - **Model provider**: resolves and caches the detection model
//! - **Preprocessor**: decodes and normalizes images into `[1, 224, 224, 3]`
//!   tensors
//! - **Inference engine**: extracts the scalar manipulation score
//! - **Aggregator**: turns the score into the final verdict record
//! - **Controller**: orchestrates the steps under an explicit state machine
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, inference backend, and tensor types
//! * [`models`] - Locators, artifact loading, and the cached model provider
//! * [`pipeline`] - The analysis pipeline and its result types
//! * [`processors`] - Image preprocessing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepfake_detector::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DetectorConfig::new().with_model_locator("models/deepfake-detector.onnx");
//!     let detector = DeepfakeDetector::builder().with_config(config).build();
//!
//!     let bytes = std::fs::read("suspect.jpg")?;
//!     let input = ImageInput::new(bytes, "image/jpeg").with_source_name("suspect.jpg");
//!
//!     let result = detector.analyze(input).await?;
//!     if let Some(confidence) = result.confidence_display() {
//!         println!("{} ({confidence}%)", result.verdict_label());
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod core;
pub mod models;

pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use deepfake_detector::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - The detector (`DeepfakeDetector`, `DeepfakeDetectorBuilder`) and its
///   configuration (`DetectorConfig`)
/// - Inputs and results (`ImageInput`, `AnalysisResult`, `AuxiliaryMetrics`,
///   `PipelineState`)
/// - Model acquisition (`ModelCache`, `ModelLocator`)
/// - Essential error and result types (`DetectorError`, `DetectorResult`)
///
/// For advanced customization (custom loaders, the inference trait),
/// import directly from the respective modules (e.g.,
/// `deepfake_detector::models`, `deepfake_detector::core::inference`).
pub mod prelude {
    pub use crate::pipeline::{
        AnalysisResult, AuxiliaryMetrics, DeepfakeDetector, DeepfakeDetectorBuilder,
        PipelineState,
    };

    // Configuration and input (essential)
    pub use crate::core::{DetectorConfig, ImageInput};

    // Model acquisition
    pub use crate::models::{ModelCache, ModelLocator};

    // Error Handling (essential)
    pub use crate::core::{DetectorError, DetectorResult};
}
