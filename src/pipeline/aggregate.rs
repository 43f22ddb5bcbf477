//! Verdict assembly from the inference score.

use crate::core::constants::DEFAULT_MANIPULATION_THRESHOLD;
use crate::pipeline::result::{AnalysisResult, AuxiliaryMetrics};

/// Turns a manipulation-likelihood score into the final [`AnalysisResult`].
///
/// The decision rule is a strict comparison against a fixed threshold: a
/// score exactly at the threshold reads as authentic. The threshold is a
/// tunable constant, not derived from data.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisAggregator {
    threshold: f32,
}

impl Default for AnalysisAggregator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MANIPULATION_THRESHOLD,
        }
    }
}

impl AnalysisAggregator {
    /// Creates an aggregator with the default threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the manipulation threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// The threshold in effect.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Builds the verdict for a score in `[0, 1]`.
    ///
    /// `confidence` is the score as a percentage rounded to two decimals;
    /// the auxiliary metrics are synthetic placeholders derived from the
    /// same score.
    pub fn aggregate(&self, score: f32) -> AnalysisResult {
        let is_manipulated = score > self.threshold;
        let confidence = round_two_decimals(score * 100.0);
        AnalysisResult::completed(
            is_manipulated,
            confidence,
            AuxiliaryMetrics::synthetic(score),
        )
    }
}

fn round_two_decimals(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_at_the_threshold_reads_authentic() {
        let result = AnalysisAggregator::new().aggregate(0.5);
        assert_eq!(result.is_manipulated, Some(false));
        assert_eq!(result.confidence, Some(50.0));
    }

    #[test]
    fn score_above_the_threshold_reads_manipulated() {
        let result = AnalysisAggregator::new().aggregate(0.73);
        assert_eq!(result.is_manipulated, Some(true));
        assert_eq!(result.confidence_display().unwrap(), "73.00");
    }

    #[test]
    fn confidence_rounds_to_two_decimals() {
        let result = AnalysisAggregator::new().aggregate(0.123456);
        assert_eq!(result.confidence, Some(12.35));
    }

    #[test]
    fn confidence_is_monotonic_in_the_score() {
        let aggregator = AnalysisAggregator::new();
        let confidences: Vec<f32> = (0..=10)
            .map(|i| {
                aggregator
                    .aggregate(i as f32 / 10.0)
                    .confidence
                    .unwrap()
            })
            .collect();
        assert!(confidences.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn custom_threshold_shifts_the_decision() {
        let aggregator = AnalysisAggregator::new().with_threshold(0.9);
        assert_eq!(aggregator.aggregate(0.73).is_manipulated, Some(false));
        assert_eq!(aggregator.aggregate(0.95).is_manipulated, Some(true));
    }

    #[test]
    fn metrics_are_always_labeled_synthetic() {
        let result = AnalysisAggregator::new().aggregate(0.4);
        let metrics = result.metrics.unwrap();
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["provenance"], "synthetic");
    }
}
