//! Helpers for constructing ONNX Runtime sessions.

use crate::core::config::{GraphOptLevel, OnnxSessionConfig};
use crate::core::errors::{DetectorError, DetectorResult};
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;

fn configured_builder(config: &OnnxSessionConfig) -> Result<SessionBuilder, ort::Error> {
    // Default log level to Error to suppress ORT logs
    let mut builder = Session::builder()?.with_log_level(LogLevel::Error)?;
    if let Some(intra) = config.intra_threads {
        builder = builder.with_intra_threads(intra)?;
    }
    let mapped = match config.get_optimization_level() {
        GraphOptLevel::DisableAll => GraphOptimizationLevel::Disable,
        GraphOptLevel::Level1 => GraphOptimizationLevel::Level1,
        GraphOptLevel::Level2 => GraphOptimizationLevel::Level2,
        GraphOptLevel::Level3 => GraphOptimizationLevel::Level3,
    };
    builder = builder.with_optimization_level(mapped)?;
    Ok(builder)
}

/// Builds a session from an ONNX model file on disk.
pub fn load_session_from_file(
    model_path: impl AsRef<Path>,
    config: &OnnxSessionConfig,
) -> DetectorResult<Session> {
    let path = model_path.as_ref();
    let session = configured_builder(config)
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| {
            DetectorError::model_load_error(
                path.display().to_string(),
                "failed to create ONNX session",
                Some("verify model file exists and is readable"),
                e,
            )
        })?;
    Ok(session)
}

/// Builds a session from ONNX model bytes already in memory, e.g. a
/// downloaded artifact.
pub fn load_session_from_memory(
    model_bytes: &[u8],
    locator: &str,
    config: &OnnxSessionConfig,
) -> DetectorResult<Session> {
    let session = configured_builder(config)
        .and_then(|b| b.commit_from_memory(model_bytes))
        .map_err(|e| {
            DetectorError::model_load_error(
                locator,
                "failed to create ONNX session from artifact bytes",
                Some("verify the artifact is a valid ONNX model"),
                e,
            )
        })?;
    Ok(session)
}
