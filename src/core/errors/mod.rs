//! Error handling for the detection pipeline.
//!
//! One structured error enum covers every failure class of the pipeline,
//! with helper constructors for building well-formed errors at call sites
//! and a `user_message` projection for the redacted string surfaced to
//! callers.
//!
//! # Usage
//!
//! ```rust
//! use deepfake_detector::core::errors::DetectorError;
//!
//! let error = DetectorError::invalid_input("declared MIME type is 'text/plain'");
//! assert!(!error.user_message().is_empty());
//! ```

pub mod constructors;
pub mod types;

pub use types::DetectorError;

/// Convenient result alias for pipeline operations.
pub type DetectorResult<T> = Result<T, DetectorError>;
