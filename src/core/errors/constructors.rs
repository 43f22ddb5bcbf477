//! Constructor helpers for [`DetectorError`].
//!
//! These keep call sites free of variant boilerplate and make sure every
//! error carries the context fields the logging layer expects.

use super::types::DetectorError;

fn format_suggestion(suggestion: Option<&str>) -> String {
    suggestion
        .map(|s| format!("; suggested fix: {s}"))
        .unwrap_or_default()
}

impl DetectorError {
    /// Creates an error for input rejected at the pipeline boundary.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a model-load error with an underlying cause.
    ///
    /// # Arguments
    ///
    /// * `locator` - The locator the load was attempted against.
    /// * `reason` - Why the load failed.
    /// * `suggestion` - Optional suggestion message (without punctuation).
    /// * `source` - The underlying error.
    pub fn model_load_error(
        locator: impl Into<String>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            locator: locator.into(),
            reason: reason.into(),
            suggestion: format_suggestion(suggestion),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a model-load error with no underlying cause.
    pub fn model_load_failure(
        locator: impl Into<String>,
        reason: impl Into<String>,
        suggestion: Option<&str>,
    ) -> Self {
        Self::ModelLoad {
            locator: locator.into(),
            reason: reason.into(),
            suggestion: format_suggestion(suggestion),
            source: None,
        }
    }

    /// Creates a decode error wrapping the decoder's failure.
    pub fn decode_error(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates an inference error with an underlying cause.
    pub fn inference_error(
        model_name: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an inference error with no underlying cause, for validation
    /// failures detected directly (e.g. an output with no scalar channel).
    pub fn inference_failure(
        model_name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: None,
        }
    }

    /// Creates a catch-all pipeline error with an underlying cause.
    pub fn pipeline_error(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Pipeline {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a catch-all pipeline error with no underlying cause.
    pub fn pipeline_failure(context: impl Into<String>) -> Self {
        Self::Pipeline {
            context: context.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invalid_input_carries_message() {
        let err = DetectorError::invalid_input("not an image");
        assert!(matches!(err, DetectorError::InvalidInput { .. }));
        assert!(err.to_string().contains("not an image"));
    }

    #[test]
    fn model_load_error_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = DetectorError::model_load_error(
            "models/detector.onnx",
            "failed to open artifact",
            Some("check the configured path"),
            io,
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("models/detector.onnx"));
        assert!(err
            .to_string()
            .contains("suggested fix: check the configured path"));
    }

    #[test]
    fn model_load_failure_has_no_source() {
        let err = DetectorError::model_load_failure("http://host/m.onnx", "status 404", None);
        assert!(err.source().is_none());
    }

    #[test]
    fn inference_failure_has_no_source() {
        let err = DetectorError::inference_failure("detector", "empty output");
        assert!(err.source().is_none());
        assert!(err.to_string().contains("detector"));
    }

    #[test]
    fn user_messages_are_non_empty_and_redacted() {
        let io = std::io::Error::other("secret internal detail");
        let errors = vec![
            DetectorError::invalid_input("mime 'text/plain'"),
            DetectorError::model_load_failure("loc", "reason", None),
            DetectorError::decode_error("bad bytes", std::io::Error::other("detail")),
            DetectorError::inference_failure("m", "no scalar"),
            DetectorError::Busy,
            DetectorError::pipeline_error("task failed", io),
        ];
        for err in errors {
            let message = err.user_message();
            assert!(!message.is_empty());
            assert!(!message.contains("secret"));
        }
    }
}
