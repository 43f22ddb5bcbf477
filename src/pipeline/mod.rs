//! The image analysis pipeline.
//!
//! This module combines model acquisition, preprocessing, inference, and
//! aggregation under a controller with an explicit lifecycle: one analysis
//! at a time, every tensor released before the run resolves.

pub mod aggregate;
pub mod controller;
pub mod engine;
pub mod result;
pub mod state;
pub mod stats;

// Re-export the main pipeline components for easier access
pub use aggregate::AnalysisAggregator;
pub use controller::{DeepfakeDetector, DeepfakeDetectorBuilder};
pub use engine::InferenceEngine;
pub use result::{AnalysisResult, AuxiliaryMetrics, MetricsProvenance};
pub use state::PipelineState;
pub use stats::{PipelineStats, StatsManager};
