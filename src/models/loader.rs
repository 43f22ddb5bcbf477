//! Loading model artifacts from disk or over the network.

use crate::core::config::OnnxSessionConfig;
use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::inference::{DetectionModel, OnnxDetectionModel};
use crate::models::locator::ModelLocator;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Resolves a [`ModelLocator`] into a ready-to-use [`DetectionModel`].
///
/// The provider calls this once per locator; implementations do not need to
/// cache anything themselves.
#[async_trait]
pub trait ModelLoader: Send + Sync + std::fmt::Debug {
    /// Loads the model the locator points at.
    async fn load(&self, locator: &ModelLocator) -> DetectorResult<Arc<dyn DetectionModel>>;
}

/// Default loader backed by ONNX Runtime.
///
/// Local paths are committed from file. URLs are downloaded and committed
/// from memory; downloaded artifacts are not persisted to disk.
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    session_config: OnnxSessionConfig,
    download_timeout: Duration,
}

impl Default for OnnxModelLoader {
    fn default() -> Self {
        Self::new(OnnxSessionConfig::default())
    }
}

impl OnnxModelLoader {
    /// Creates a loader that builds sessions with the given options.
    pub fn new(session_config: OnnxSessionConfig) -> Self {
        Self {
            session_config,
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
        }
    }

    /// Sets the timeout applied to artifact downloads.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    async fn fetch_remote(&self, url: &str) -> DetectorResult<Vec<u8>> {
        let client = reqwest::Client::builder()
            .timeout(self.download_timeout)
            .build()
            .map_err(|e| {
                DetectorError::model_load_error(url, "failed to build HTTP client", None, e)
            })?;

        let response = client.get(url).send().await.map_err(|e| {
            DetectorError::model_load_error(
                url,
                "failed to download model artifact",
                Some("check network connectivity and the artifact URL"),
                e,
            )
        })?;

        if !response.status().is_success() {
            return Err(DetectorError::model_load_failure(
                url,
                format!("download returned status {}", response.status()),
                Some("check the artifact URL"),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| {
            DetectorError::model_load_error(
                url,
                "failed to read model artifact body",
                None,
                e,
            )
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ModelLoader for OnnxModelLoader {
    async fn load(&self, locator: &ModelLocator) -> DetectorResult<Arc<dyn DetectionModel>> {
        let config = self.session_config.clone();
        let model = match locator {
            ModelLocator::Url(url) => {
                let bytes = self.fetch_remote(url).await?;
                info!(
                    "Downloaded model artifact from {} ({} bytes)",
                    url,
                    bytes.len()
                );
                let url = url.clone();
                tokio::task::spawn_blocking(move || {
                    OnnxDetectionModel::from_memory(&bytes, &url, &config)
                })
                .await
                .map_err(|e| DetectorError::pipeline_error("model build task failed", e))??
            }
            ModelLocator::Path(path) => {
                let exists = tokio::fs::try_exists(path).await.unwrap_or(false);
                if !exists {
                    return Err(DetectorError::model_load_failure(
                        path.display().to_string(),
                        "model file does not exist",
                        Some("check the configured model path"),
                    ));
                }
                let path = path.clone();
                tokio::task::spawn_blocking(move || OnnxDetectionModel::from_file(&path, &config))
                    .await
                    .map_err(|e| DetectorError::pipeline_error("model build task failed", e))??
            }
        };

        info!("Loaded detection model '{}' from {}", model.name(), locator);
        Ok(Arc::new(model) as Arc<dyn DetectionModel>)
    }
}
