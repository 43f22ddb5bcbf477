//! Analysis orchestration and lifecycle management.

use crate::core::config::DetectorConfig;
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::input::ImageInput;
use crate::core::tensor::TensorGauge;
use crate::models::loader::{ModelLoader, OnnxModelLoader};
use crate::models::locator::ModelLocator;
use crate::models::provider::{ModelCache, ModelProvider};
use crate::pipeline::aggregate::AnalysisAggregator;
use crate::pipeline::engine::InferenceEngine;
use crate::pipeline::result::AnalysisResult;
use crate::pipeline::state::PipelineState;
use crate::pipeline::stats::{PipelineStats, StatsManager};
use crate::processors::preprocess::ImagePreprocessor;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, error, info};

fn lock_state(state: &Mutex<PipelineState>) -> MutexGuard<'_, PipelineState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the single `Running` slot and resolves it on every exit path.
///
/// Dropping an armed guard (cancelled future, panicking sub-step) resolves
/// the slot to `Failed`, so the detector can never stick in `Running`.
struct RunGuard {
    state: Arc<Mutex<PipelineState>>,
    armed: bool,
}

impl RunGuard {
    fn finish(mut self, next: PipelineState) {
        self.armed = false;
        *lock_state(&self.state) = next;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.armed {
            *lock_state(&self.state) =
                PipelineState::Failed("analysis was cancelled before completing".to_string());
        }
    }
}

/// Builder for [`DeepfakeDetector`].
///
/// The cache and loader default to a fresh [`ModelCache`] and the ONNX
/// Runtime loader; hand in shared or stub implementations to override.
#[derive(Debug, Default)]
pub struct DeepfakeDetectorBuilder {
    config: DetectorConfig,
    cache: Option<Arc<ModelCache>>,
    loader: Option<Arc<dyn ModelLoader>>,
}

impl DeepfakeDetectorBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pipeline configuration.
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an existing cache instead of creating a private one.
    pub fn with_cache(mut self, cache: Arc<ModelCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the model loader.
    pub fn with_loader(mut self, loader: Arc<dyn ModelLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Builds the detector. Model loading stays lazy, so construction never
    /// performs I/O.
    pub fn build(self) -> DeepfakeDetector {
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ModelCache::new()));
        let loader = self
            .loader
            .unwrap_or_else(|| Arc::new(OnnxModelLoader::new(self.config.onnx.clone())));
        let gauge = TensorGauge::new();

        DeepfakeDetector {
            provider: ModelProvider::new(cache, loader),
            preprocessor: Arc::new(
                ImagePreprocessor::new(gauge.clone()).with_target_size(self.config.input_size),
            ),
            engine: InferenceEngine::new(),
            aggregator: AnalysisAggregator::new()
                .with_threshold(self.config.manipulation_threshold),
            locator: ModelLocator::parse(&self.config.model_locator),
            state: Arc::new(Mutex::new(PipelineState::Idle)),
            stats: StatsManager::new(),
            gauge,
        }
    }
}

/// Orchestrates one analysis at a time over the full pipeline: model
/// acquisition, preprocessing, inference, and aggregation.
///
/// Concurrency policy: a detector owns a single analysis slot. A request
/// arriving while another analysis is running is rejected with
/// [`DetectorError::Busy`]; it is never queued or silently interleaved.
/// Pipeline failures after input validation resolve to a user-facing
/// [`AnalysisResult`] carrying an `error` message; only the busy rejection
/// surfaces as `Err`.
///
/// Every input tensor created during a run is released before the state
/// machine leaves `Running`, on success, failure, and cancellation alike.
#[derive(Debug)]
pub struct DeepfakeDetector {
    provider: ModelProvider,
    preprocessor: Arc<ImagePreprocessor>,
    engine: InferenceEngine,
    aggregator: AnalysisAggregator,
    locator: ModelLocator,
    state: Arc<Mutex<PipelineState>>,
    stats: StatsManager,
    gauge: TensorGauge,
}

impl Default for DeepfakeDetector {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DeepfakeDetector {
    /// Returns a builder with the default configuration.
    pub fn builder() -> DeepfakeDetectorBuilder {
        DeepfakeDetectorBuilder::new()
    }

    /// Analyzes one image and resolves to its [`AnalysisResult`].
    ///
    /// Inputs whose MIME type is not `image/*` fail immediately, before any
    /// model load or decode is attempted. Returns
    /// `Err(`[`DetectorError::Busy`]`)` when an analysis is already in
    /// flight; every other failure is reported inside the result.
    pub async fn analyze(&self, input: ImageInput) -> DetectorResult<AnalysisResult> {
        let guard = self.begin_run()?;
        let started = Instant::now();
        info!(
            "Starting analysis for {}",
            input.source_name().unwrap_or("<unnamed input>")
        );

        if !input.is_image() {
            let err = DetectorError::invalid_input(format!(
                "expected an image MIME type, got '{}'",
                input.mime_type()
            ));
            return Ok(self.fail_run(guard, started, err));
        }

        match self.run_pipeline(input).await {
            Ok(result) => {
                let latency_ms = elapsed_ms(started);
                info!("Analysis completed in {:.1} ms: {}", latency_ms, result);
                self.stats
                    .record_completed(result.is_manipulated.unwrap_or(false), latency_ms);
                guard.finish(PipelineState::Completed(result.clone()));
                Ok(result)
            }
            Err(err) => Ok(self.fail_run(guard, started, err)),
        }
    }

    /// Runs the four pipeline steps strictly in sequence. The input tensor
    /// is dropped inside the inference task, before the score leaves it, so
    /// even a cancelled run releases the tensor once the task finishes.
    async fn run_pipeline(&self, input: ImageInput) -> DetectorResult<AnalysisResult> {
        let model = self.provider.get_model(&self.locator).await?;
        debug!("Using model '{}'", model.name());

        let preprocessor = self.preprocessor.clone();
        let tensor = tokio::task::spawn_blocking(move || preprocessor.prepare(input.bytes()))
            .await
            .map_err(|e| DetectorError::pipeline_error("preprocessing task failed", e))??;

        let engine = self.engine;
        let score = tokio::task::spawn_blocking(move || {
            let outcome = engine.infer(&model, &tensor);
            drop(tensor);
            outcome
        })
        .await
        .map_err(|e| DetectorError::pipeline_error("inference task failed", e))??;

        Ok(self.aggregator.aggregate(score))
    }

    fn begin_run(&self) -> DetectorResult<RunGuard> {
        let mut state = lock_state(&self.state);
        if state.is_running() {
            return Err(DetectorError::Busy);
        }
        *state = PipelineState::Running;
        Ok(RunGuard {
            state: self.state.clone(),
            armed: true,
        })
    }

    fn fail_run(&self, guard: RunGuard, started: Instant, err: DetectorError) -> AnalysisResult {
        let latency_ms = elapsed_ms(started);
        error!("Analysis failed after {:.1} ms: {}", latency_ms, err);
        self.stats.record_failed(latency_ms);

        let message = err.user_message();
        guard.finish(PipelineState::Failed(message.clone()));
        AnalysisResult::failed(message)
    }

    /// Snapshot of the current lifecycle state.
    pub fn state(&self) -> PipelineState {
        lock_state(&self.state).clone()
    }

    /// Number of input tensors currently alive.
    pub fn live_tensors(&self) -> usize {
        self.gauge.live()
    }

    /// Snapshot of the accumulated statistics.
    pub fn stats(&self) -> PipelineStats {
        self.stats.get_stats()
    }

    /// Resets the accumulated statistics.
    pub fn reset_stats(&self) {
        self.stats.reset_stats();
    }

    /// The cache backing this detector's model provider.
    pub fn model_cache(&self) -> &Arc<ModelCache> {
        self.provider.cache()
    }

    /// The locator analyses resolve their model from.
    pub fn model_locator(&self) -> &ModelLocator {
        &self.locator
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::result::AuxiliaryMetrics;

    #[test]
    fn new_detector_starts_idle() {
        let detector = DeepfakeDetector::builder().build();
        assert!(detector.state().is_idle());
        assert_eq!(detector.live_tensors(), 0);
    }

    #[test]
    fn builder_accepts_a_shared_cache() {
        let cache = Arc::new(ModelCache::new());
        let first = DeepfakeDetector::builder()
            .with_cache(cache.clone())
            .build();
        let second = DeepfakeDetector::builder().with_cache(cache).build();
        assert!(Arc::ptr_eq(first.model_cache(), second.model_cache()));
    }

    #[test]
    fn second_run_is_rejected_while_the_slot_is_held() {
        let detector = DeepfakeDetector::builder().build();
        let guard = detector.begin_run().unwrap();

        assert!(detector.state().is_running());
        assert!(matches!(detector.begin_run(), Err(DetectorError::Busy)));

        let result = AnalysisResult::completed(true, 73.0, AuxiliaryMetrics::synthetic(0.73));
        guard.finish(PipelineState::Completed(result));
        assert!(detector.state().is_completed());
        assert!(detector.begin_run().is_ok());
    }

    #[test]
    fn abandoned_guard_resolves_to_failed() {
        let detector = DeepfakeDetector::builder().build();
        let guard = detector.begin_run().unwrap();
        drop(guard);

        assert!(detector.state().is_failed());
        assert!(detector.begin_run().is_ok());
    }

    #[tokio::test]
    async fn non_image_mime_fails_without_a_model_load() {
        let detector = DeepfakeDetector::builder().build();
        let input = ImageInput::new(b"hello".to_vec(), "text/plain");

        let result = detector.analyze(input).await.unwrap();

        assert!(result.is_failed());
        assert!(detector.state().is_failed());
        assert!(detector.model_cache().is_empty());
        assert_eq!(detector.stats().failed_analyses, 1);
    }
}
