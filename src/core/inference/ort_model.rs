//! ONNX Runtime backed detection model with session pooling.

use crate::core::config::OnnxSessionConfig;
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::inference::{load_session_from_file, load_session_from_memory, DetectionModel};
use crate::core::tensor::{OutputTensor, Tensor4D};
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// ONNX Runtime implementation of [`DetectionModel`].
///
/// Holds a pool of sessions and picks the next one round-robin per call so
/// concurrent predictions do not serialize on a single session lock. Input
/// and output tensor names are discovered from the model graph at load time.
pub struct OnnxDetectionModel {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    input_name: String,
    output_name: String,
    model_name: String,
}

impl std::fmt::Debug for OnnxDetectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxDetectionModel")
            .field("sessions", &self.sessions.len())
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OnnxDetectionModel {
    /// Loads a model from an ONNX file on disk, building a session pool of
    /// the configured size.
    pub fn from_file(
        model_path: impl AsRef<Path>,
        config: &OnnxSessionConfig,
    ) -> DetectorResult<Self> {
        let path = model_path.as_ref();
        let pool_size = config.get_session_pool_size();
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(load_session_from_file(path, config)?);
        }
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();
        Self::from_sessions(sessions, &path.display().to_string(), model_name)
    }

    /// Loads a model from ONNX bytes already in memory, e.g. a downloaded
    /// artifact. `locator` is used only for naming and error context.
    pub fn from_memory(
        model_bytes: &[u8],
        locator: &str,
        config: &OnnxSessionConfig,
    ) -> DetectorResult<Self> {
        let pool_size = config.get_session_pool_size();
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(load_session_from_memory(model_bytes, locator, config)?);
        }
        let model_name = locator
            .rsplit('/')
            .next()
            .and_then(|s| s.split('.').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown_model")
            .to_string();
        Self::from_sessions(sessions, locator, model_name)
    }

    fn from_sessions(
        sessions: Vec<Session>,
        locator: &str,
        model_name: String,
    ) -> DetectorResult<Self> {
        let first = sessions.first().ok_or_else(|| {
            DetectorError::model_load_failure(locator, "session pool is empty", None)
        })?;
        let input_name = first
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                DetectorError::model_load_failure(
                    locator,
                    "model declares no inputs",
                    Some("verify the artifact is a valid ONNX model"),
                )
            })?;
        let output_name = first
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                DetectorError::model_load_failure(
                    locator,
                    "model declares no outputs",
                    Some("verify the artifact is a valid ONNX model"),
                )
            })?;

        Ok(Self {
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            next_idx: AtomicUsize::new(0),
            input_name,
            output_name,
            model_name,
        })
    }
}

impl DetectionModel for OnnxDetectionModel {
    fn predict(&self, input: &Tensor4D) -> DetectorResult<OutputTensor> {
        let input_shape = input.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            DetectorError::inference_error(
                &self.model_name,
                format!(
                    "failed to convert input tensor with shape {:?}",
                    input_shape
                ),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            DetectorError::inference_failure(
                &self.model_name,
                format!(
                    "failed to acquire session lock {}/{}",
                    idx,
                    self.sessions.len()
                ),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            DetectorError::inference_error(
                &self.model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input_name, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DetectorError::inference_error(
                    &self.model_name,
                    format!(
                        "failed to extract output tensor '{}' as f32",
                        self.output_name
                    ),
                    e,
                )
            })?;

        let shape: Vec<usize> = output_shape.iter().map(|&d| d as usize).collect();
        Ok(OutputTensor::new(shape, output_data.to_vec()))
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
