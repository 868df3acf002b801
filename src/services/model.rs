//! Model provider - owns the classifier lifecycle and readiness
//!
//! The classifier is published exactly once, fully constructed, so a request
//! either sees no model at all or the complete one. There is no reload: a
//! failed load leaves the provider not ready until the process restarts.

use anyhow::Result;
use candle_core::Tensor;
use std::sync::{Arc, OnceLock};

use super::error::PredictError;
use crate::classifier::Classifier;

#[derive(Default)]
pub struct ModelProvider {
    classifier: OnceLock<Arc<dyn Classifier>>,
}

impl ModelProvider {
    /// Provider with no model; call [`ModelProvider::load`] to populate it
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that is ready from the start
    #[cfg(test)]
    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        let provider = Self::new();
        let _ = provider.classifier.set(classifier);
        provider
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.get().is_some()
    }

    /// Run the blocking `loader` off the async runtime and publish its result.
    /// Failures are logged and leave the provider not ready.
    pub async fn load<F, C>(&self, loader: F)
    where
        F: FnOnce() -> Result<C> + Send + 'static,
        C: Classifier + 'static,
    {
        log::info!("Loading model...");

        let loaded = match tokio::task::spawn_blocking(loader).await {
            Ok(Ok(classifier)) => classifier,
            Ok(Err(e)) => {
                log::error!("Failed to load model: {:#}", e);
                return;
            }
            Err(e) => {
                log::error!("Model loader task failed: {}", e);
                return;
            }
        };

        if self.classifier.set(Arc::new(loaded)).is_err() {
            log::warn!("Model already loaded, discarding second load");
            return;
        }

        log::info!("Model loaded successfully");
    }

    /// Score one input tensor. Runs on the blocking pool; the caller waits
    /// for the result without holding up other requests.
    pub async fn score(&self, input: Tensor) -> Result<f32, PredictError> {
        let classifier = self
            .classifier
            .get()
            .cloned()
            .ok_or(PredictError::ModelNotReady)?;

        tokio::task::spawn_blocking(move || classifier.score(&input))
            .await
            .map_err(|e| PredictError::Unexpected(format!("scoring task failed: {e}")))?
            .map_err(PredictError::Inference)
    }
}
