//! Scalar score extraction over a detection model.

use crate::core::errors::{DetectorError, DetectorResult};
use crate::core::inference::DetectionModel;
use crate::core::tensor::ImageTensor;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs a prepared tensor through a model and reads out the scalar
/// manipulation-likelihood score.
///
/// Deterministic: the same model and tensor always yield the same score.
/// The engine holds no state and retains neither the model nor the tensor
/// after `infer` returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceEngine;

impl InferenceEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Returns the score in `[0, 1]` from the first channel of the model
    /// output.
    ///
    /// Fails when the output carries no scalar channel or the scalar is not
    /// a number. Finite scores outside `[0, 1]` are clamped and logged.
    pub fn infer(
        &self,
        model: &Arc<dyn DetectionModel>,
        tensor: &ImageTensor,
    ) -> DetectorResult<f32> {
        let output = model.predict(tensor.array())?;

        let Some(&raw) = output.data.first() else {
            return Err(DetectorError::inference_failure(
                model.name(),
                format!(
                    "model output with shape {:?} contains no scalar channel",
                    output.shape
                ),
            ));
        };

        if raw.is_nan() {
            return Err(DetectorError::inference_failure(
                model.name(),
                "model output is not a number",
            ));
        }

        let score = if (0.0..=1.0).contains(&raw) {
            raw
        } else {
            warn!("Model score {raw} out of range [0.0, 1.0], clamping");
            raw.clamp(0.0, 1.0)
        };

        debug!("Inference complete with score {score:.4}");
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tensor::{OutputTensor, Tensor4D};
    use ndarray::Array4;

    #[derive(Debug)]
    struct FixedModel {
        output: Vec<f32>,
    }

    impl DetectionModel for FixedModel {
        fn predict(&self, _input: &Tensor4D) -> DetectorResult<OutputTensor> {
            Ok(OutputTensor::new(
                vec![1, self.output.len()],
                self.output.clone(),
            ))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn model(output: Vec<f32>) -> Arc<dyn DetectionModel> {
        Arc::new(FixedModel { output })
    }

    fn unit_tensor() -> ImageTensor {
        ImageTensor::untracked(Array4::zeros((1, 224, 224, 3)))
    }

    #[test]
    fn identical_inputs_yield_identical_scores() {
        let engine = InferenceEngine::new();
        let model = model(vec![0.73, 0.12]);
        let tensor = unit_tensor();

        let first = engine.infer(&model, &tensor).unwrap();
        let second = engine.infer(&model, &tensor).unwrap();
        assert_eq!(first, 0.73);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_output_is_an_inference_error() {
        let engine = InferenceEngine::new();
        let result = engine.infer(&model(vec![]), &unit_tensor());
        assert!(matches!(result, Err(DetectorError::Inference { .. })));
    }

    #[test]
    fn nan_output_is_an_inference_error() {
        let engine = InferenceEngine::new();
        let result = engine.infer(&model(vec![f32::NAN]), &unit_tensor());
        assert!(matches!(result, Err(DetectorError::Inference { .. })));
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let engine = InferenceEngine::new();
        assert_eq!(engine.infer(&model(vec![1.7]), &unit_tensor()).unwrap(), 1.0);
        assert_eq!(
            engine.infer(&model(vec![-0.3]), &unit_tensor()).unwrap(),
            0.0
        );
    }

    #[test]
    fn only_the_first_channel_is_read() {
        let engine = InferenceEngine::new();
        let score = engine
            .infer(&model(vec![0.2, 0.9, 0.9]), &unit_tensor())
            .unwrap();
        assert_eq!(score, 0.2);
    }
}
