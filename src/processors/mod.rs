//! Image processing for the detection pipeline.
//!
//! Currently a single stage: [`ImagePreprocessor`] turns raw image bytes
//! into the `[1, H, W, 3]` float tensor the detection model consumes.

pub mod preprocess;

pub use preprocess::ImagePreprocessor;
