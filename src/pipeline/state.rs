//! Pipeline lifecycle states.

use crate::pipeline::result::AnalysisResult;
use std::fmt;

/// Lifecycle of the single analysis slot a detector owns.
///
/// Transitions: `Idle -> Running -> Completed | Failed`, and a new request
/// re-enters `Running` from `Idle`, `Completed`, or `Failed`. Requests
/// arriving while `Running` are rejected, never queued or interleaved.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PipelineState {
    /// No analysis has run yet, or the last outcome was consumed.
    #[default]
    Idle,
    /// An analysis is in flight.
    Running,
    /// The last analysis produced a verdict.
    Completed(AnalysisResult),
    /// The last analysis ended in an error.
    Failed(String),
}

impl PipelineState {
    /// True when no analysis is in flight and none has resolved.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True while an analysis is in flight.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// True when the last analysis produced a verdict.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// True when the last analysis ended in an error.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(message) => write!(f, "failed: {message}"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert!(PipelineState::default().is_idle());
    }

    #[test]
    fn predicates_track_variants() {
        assert!(PipelineState::Running.is_running());
        assert!(PipelineState::Failed("boom".into()).is_failed());
        assert!(!PipelineState::Running.is_completed());
    }

    #[test]
    fn display_includes_the_failure_message() {
        let state = PipelineState::Failed("invalid input".into());
        assert_eq!(state.to_string(), "failed: invalid input");
        assert_eq!(PipelineState::Running.to_string(), "running");
    }
}
