//! Configuration types for the detection pipeline.

use crate::core::constants::{
    DEFAULT_MANIPULATION_THRESHOLD, DEFAULT_MODEL_LOCATION, DEFAULT_TARGET_SIZE,
};
use serde::{Deserialize, Serialize};

/// Graph optimization levels for ONNX Runtime sessions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum GraphOptLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    #[default]
    Level3,
}

/// Configuration for ONNX Runtime sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OnnxSessionConfig {
    /// Number of threads used to parallelize execution within nodes.
    pub intra_threads: Option<usize>,
    /// Graph optimization level.
    pub optimization_level: Option<GraphOptLevel>,
    /// Number of pooled sessions available for concurrent inference.
    pub session_pool_size: Option<usize>,
}

impl OnnxSessionConfig {
    /// Creates a new OnnxSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: GraphOptLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Sets the session pool size.
    pub fn with_session_pool_size(mut self, size: usize) -> Self {
        self.session_pool_size = Some(size);
        self
    }

    /// Gets the effective number of intra-op threads.
    pub fn get_intra_threads(&self) -> usize {
        self.intra_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Gets the effective graph optimization level.
    pub fn get_optimization_level(&self) -> GraphOptLevel {
        self.optimization_level.unwrap_or_default()
    }

    /// Gets the effective session pool size (at least 1).
    pub fn get_session_pool_size(&self) -> usize {
        self.session_pool_size.unwrap_or(1).max(1)
    }
}

/// Top-level configuration for the detector pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Model artifact location: an `http(s)` URL or a filesystem path.
    pub model_locator: String,
    /// Model input size as (height, width).
    pub input_size: (u32, u32),
    /// Score above which an image is labeled manipulated (strict comparison).
    pub manipulation_threshold: f32,
    /// ONNX Runtime session options.
    pub onnx: OnnxSessionConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_locator: DEFAULT_MODEL_LOCATION.to_string(),
            input_size: DEFAULT_TARGET_SIZE,
            manipulation_threshold: DEFAULT_MANIPULATION_THRESHOLD,
            onnx: OnnxSessionConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Creates a new DetectorConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model artifact locator.
    pub fn with_model_locator(mut self, locator: impl Into<String>) -> Self {
        self.model_locator = locator.into();
        self
    }

    /// Sets the model input size as (height, width).
    pub fn with_input_size(mut self, size: (u32, u32)) -> Self {
        self.input_size = size;
        self
    }

    /// Sets the manipulation threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.manipulation_threshold = threshold;
        self
    }

    /// Sets the ONNX Runtime session options.
    pub fn with_onnx(mut self, onnx: OnnxSessionConfig) -> Self {
        self.onnx = onnx;
        self
    }
}
