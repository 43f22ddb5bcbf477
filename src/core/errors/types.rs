//! Error types for the detection pipeline.

use thiserror::Error;

/// Errors raised by the detection pipeline.
///
/// Each variant corresponds to one failure class of the pipeline: input
/// validation, model acquisition, image decoding, inference execution, the
/// busy rejection of a concurrent submit, and a catch-all for everything
/// else. Variants carry structured context for logging; the redacted string
/// handed to callers comes from [`DetectorError::user_message`].
#[derive(Error, Debug)]
pub enum DetectorError {
    /// The input was rejected before the pipeline ran.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong with the input.
        message: String,
    },

    /// The model artifact could not be fetched or parsed.
    #[error("failed to load model from '{locator}': {reason}{suggestion}")]
    ModelLoad {
        /// The locator the load was attempted against.
        locator: String,
        /// Why the load failed.
        reason: String,
        /// Pre-formatted hint for resolving the failure, empty when none
        /// exists.
        suggestion: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The image bytes could not be decoded into pixels.
    #[error("image decode failed: {context}")]
    Decode {
        /// Additional context about the decode attempt.
        context: String,
        /// The underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Inference failed or the model output was malformed.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// The model that was running.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An analysis is already running on this controller.
    #[error("an analysis is already in progress on this controller")]
    Busy,

    /// Any other pipeline failure.
    #[error("pipeline failure: {context}")]
    Pipeline {
        /// Additional context about the failure.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DetectorError {
    /// The redacted, user-facing message for this error.
    ///
    /// Internal context and source chains stay in the logs; this string is
    /// what reaches the caller inside a failed analysis record.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { .. } => "Please provide a valid image file.".to_string(),
            Self::ModelLoad { .. } => {
                "Analysis failed: the detection model could not be loaded.".to_string()
            }
            Self::Decode { .. } => {
                "Analysis failed: the image could not be decoded.".to_string()
            }
            Self::Inference { .. } | Self::Pipeline { .. } => {
                "Analysis failed. Please try again.".to_string()
            }
            Self::Busy => "An analysis is already in progress.".to_string(),
        }
    }
}
