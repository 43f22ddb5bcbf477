//! Analysis result types.

use serde::{Serialize, Serializer};
use std::fmt;

/// How the auxiliary metrics were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsProvenance {
    /// Derived heuristically from the headline score rather than measured
    /// by dedicated sub-models. Never authoritative.
    Synthetic,
}

/// Per-aspect consistency scores in `[0, 100]`.
///
/// No dedicated sub-model exists for any of these aspects; the values are
/// derived from the headline score and tagged with
/// [`MetricsProvenance::Synthetic`] in the serialized output so consumers
/// cannot mistake them for measured analysis.
///
/// Fields serialize in declared order: `faceConsistency`, `eyeMovement`,
/// `skinTexture`, `lightingConsistency`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliaryMetrics {
    pub face_consistency: f32,
    pub eye_movement: f32,
    pub skin_texture: f32,
    pub lighting_consistency: f32,
    /// Marks every value above as synthetic.
    pub provenance: MetricsProvenance,
}

impl AuxiliaryMetrics {
    /// Derives deterministic placeholder metrics from the headline score.
    ///
    /// Each aspect is the authenticity percentage `(1 - score) * 100` scaled
    /// by a fixed per-aspect weight, so a low manipulation score reads as
    /// high consistency across the board. All values stay in `[0, 100]`.
    pub fn synthetic(score: f32) -> Self {
        let authenticity = (1.0 - score.clamp(0.0, 1.0)) * 100.0;
        let scaled = |weight: f32| (authenticity * weight).clamp(0.0, 100.0);
        Self {
            face_consistency: scaled(0.97),
            eye_movement: scaled(0.91),
            skin_texture: scaled(0.94),
            lighting_consistency: scaled(0.88),
            provenance: MetricsProvenance::Synthetic,
        }
    }

    /// Metric names and values in declared order.
    pub fn entries(&self) -> [(&'static str, f32); 4] {
        [
            ("faceConsistency", self.face_consistency),
            ("eyeMovement", self.eye_movement),
            ("skinTexture", self.skin_texture),
            ("lightingConsistency", self.lighting_consistency),
        ]
    }
}

/// The outcome of one analysis request.
///
/// Exactly one side is populated: either the verdict fields
/// (`is_manipulated`, `confidence`, `metrics`) for a completed analysis, or
/// `error` with a user-facing message for a failed one. Immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_manipulated: Option<bool>,
    /// Manipulation confidence in `[0, 100]`, serialized as a string with
    /// two decimals (e.g. `"73.00"`).
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_confidence"
    )]
    pub confidence: Option<f32>,
    #[serde(rename = "analysis", skip_serializing_if = "Option::is_none")]
    pub metrics: Option<AuxiliaryMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn serialize_confidence<S>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(confidence) => serializer.serialize_str(&format!("{confidence:.2}")),
        None => serializer.serialize_none(),
    }
}

impl AnalysisResult {
    /// Builds the result for an analysis that produced a verdict.
    pub fn completed(is_manipulated: bool, confidence: f32, metrics: AuxiliaryMetrics) -> Self {
        Self {
            is_manipulated: Some(is_manipulated),
            confidence: Some(confidence),
            metrics: Some(metrics),
            error: None,
        }
    }

    /// Builds the result for an analysis that ended in an error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_manipulated: None,
            confidence: None,
            metrics: None,
            error: Some(message.into()),
        }
    }

    /// True when the analysis produced a verdict.
    pub fn is_completed(&self) -> bool {
        self.error.is_none()
    }

    /// True when the analysis ended in an error.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Confidence rendered with two decimals, e.g. `"73.00"`.
    pub fn confidence_display(&self) -> Option<String> {
        self.confidence.map(|c| format!("{c:.2}"))
    }

    /// Human-readable verdict label.
    pub fn verdict_label(&self) -> &'static str {
        match self.is_manipulated {
            Some(true) => "Potential Deepfake",
            Some(false) => "Likely Authentic",
            None => "Analysis Failed",
        }
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, "Analysis Failed: {error}");
        }
        write!(f, "{}", self.verdict_label())?;
        if let Some(confidence) = self.confidence_display() {
            write!(f, " (confidence {confidence}%)")?;
        }
        Ok(())
    }
}
