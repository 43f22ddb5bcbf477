//! Model provider with explicit caching and request coalescing.

use crate::core::errors::DetectorResult;
use crate::core::inference::DetectionModel;
use crate::models::loader::ModelLoader;
use crate::models::locator::ModelLocator;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::debug;

type ModelCell = Arc<OnceCell<Arc<dyn DetectionModel>>>;

/// Shared cache of loaded models keyed by locator.
///
/// The cache is owned by the caller and handed to the provider explicitly,
/// so its lifetime is controlled from outside and one cache can back several
/// providers.
#[derive(Debug, Default)]
pub struct ModelCache {
    cells: Mutex<HashMap<ModelLocator, ModelCell>>,
}

impl ModelCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, locator: &ModelLocator) -> ModelCell {
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.entry(locator.clone()).or_default().clone()
    }

    /// Returns the cached model for a locator without triggering a load.
    pub fn peek(&self, locator: &ModelLocator) -> Option<Arc<dyn DetectionModel>> {
        let cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.get(locator).and_then(|cell| cell.get().cloned())
    }

    /// Number of locators with a fully loaded model.
    pub fn len(&self) -> usize {
        let cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.values().filter(|cell| cell.initialized()).count()
    }

    /// True when no model has finished loading.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached model.
    ///
    /// Loads already in flight keep running against their detached cells and
    /// their callers still receive the loaded model; the next `get_model`
    /// for the same locator loads fresh.
    pub fn clear(&self) {
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cells.clear();
    }
}

/// Resolves locators to loaded models, loading each at most once.
///
/// Concurrent `get_model` calls for the same locator coalesce onto a single
/// load and all callers receive the same model instance. A failed load
/// leaves the cache unchanged, so the next call retries.
#[derive(Debug, Clone)]
pub struct ModelProvider {
    cache: Arc<ModelCache>,
    loader: Arc<dyn ModelLoader>,
}

impl ModelProvider {
    /// Creates a provider over an explicit cache and loader.
    pub fn new(cache: Arc<ModelCache>, loader: Arc<dyn ModelLoader>) -> Self {
        Self { cache, loader }
    }

    /// Returns the model for a locator, loading it on first use.
    pub async fn get_model(
        &self,
        locator: &ModelLocator,
    ) -> DetectorResult<Arc<dyn DetectionModel>> {
        let cell = self.cache.cell(locator);
        let model = cell
            .get_or_try_init(|| async {
                debug!("Model cache miss for {}", locator);
                self.loader.load(locator).await
            })
            .await?;
        Ok(model.clone())
    }

    /// The cache backing this provider.
    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::DetectorError;
    use crate::core::tensor::{OutputTensor, Tensor4D};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct StubModel;

    impl DetectionModel for StubModel {
        fn predict(&self, _input: &Tensor4D) -> DetectorResult<OutputTensor> {
            Ok(OutputTensor::new(vec![1, 1], vec![0.5]))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[derive(Debug, Default)]
    struct CountingLoader {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl ModelLoader for CountingLoader {
        async fn load(&self, _locator: &ModelLocator) -> DetectorResult<Arc<dyn DetectionModel>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StubModel))
        }
    }

    #[derive(Debug)]
    struct FailingLoader;

    #[async_trait]
    impl ModelLoader for FailingLoader {
        async fn load(&self, locator: &ModelLocator) -> DetectorResult<Arc<dyn DetectionModel>> {
            Err(DetectorError::model_load_failure(
                locator.to_string(),
                "stub loader always fails",
                None,
            ))
        }
    }

    fn provider_with_counting_loader() -> (ModelProvider, Arc<CountingLoader>) {
        let loader = Arc::new(CountingLoader::default());
        let provider = ModelProvider::new(Arc::new(ModelCache::new()), loader.clone());
        (provider, loader)
    }

    #[tokio::test]
    async fn repeated_calls_load_once_and_share_the_instance() {
        let (provider, loader) = provider_with_counting_loader();
        let locator = ModelLocator::parse("models/a.onnx");

        let first = provider.get_model(&locator).await.unwrap();
        let second = provider.get_model(&locator).await.unwrap();

        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn distinct_locators_load_separately() {
        let (provider, loader) = provider_with_counting_loader();

        provider
            .get_model(&ModelLocator::parse("models/a.onnx"))
            .await
            .unwrap();
        provider
            .get_model(&ModelLocator::parse("models/b.onnx"))
            .await
            .unwrap();

        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
        assert_eq!(provider.cache().len(), 2);
    }

    #[tokio::test]
    async fn clear_forces_a_reload() {
        let (provider, loader) = provider_with_counting_loader();
        let locator = ModelLocator::parse("models/a.onnx");

        provider.get_model(&locator).await.unwrap();
        provider.cache().clear();
        assert!(provider.cache().is_empty());

        provider.get_model(&locator).await.unwrap();
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_leaves_the_cache_retryable() {
        let cache = Arc::new(ModelCache::new());
        let locator = ModelLocator::parse("models/a.onnx");

        let failing = ModelProvider::new(cache.clone(), Arc::new(FailingLoader));
        assert!(failing.get_model(&locator).await.is_err());
        assert!(cache.peek(&locator).is_none());

        let working = ModelProvider::new(cache.clone(), Arc::new(CountingLoader::default()));
        assert!(working.get_model(&locator).await.is_ok());
        assert!(cache.peek(&locator).is_some());
    }

    #[tokio::test]
    async fn peek_never_triggers_a_load() {
        let (provider, loader) = provider_with_counting_loader();
        let locator = ModelLocator::parse("models/a.onnx");

        assert!(provider.cache().peek(&locator).is_none());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
    }
}
