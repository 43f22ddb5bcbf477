//! Pipeline-wide statistics helpers.
//!
//! This module defines the `PipelineStats` structure used to track execution
//! metrics for analysis runs and the `StatsManager` helper that coordinates
//! thread-safe updates to these metrics.

use std::fmt;
use std::sync::Mutex;

/// Statistics for the detection pipeline.
///
/// Tracks how many analyses ran, how they ended, and the verdict split among
/// completed runs.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// The total number of analyses started and resolved.
    pub total_analyses: usize,
    /// The number of analyses that produced a verdict.
    pub completed_analyses: usize,
    /// The number of analyses that ended in an error.
    pub failed_analyses: usize,
    /// Completed analyses whose verdict was "manipulated".
    pub manipulated_verdicts: usize,
    /// Completed analyses whose verdict was "authentic".
    pub authentic_verdicts: usize,
    /// The average end-to-end latency in milliseconds.
    pub average_latency_ms: f64,
}

impl PipelineStats {
    /// Creates a new PipelineStats instance with default values.
    pub fn new() -> Self {
        Self {
            total_analyses: 0,
            completed_analyses: 0,
            failed_analyses: 0,
            manipulated_verdicts: 0,
            authentic_verdicts: 0,
            average_latency_ms: 0.0,
        }
    }

    /// Returns the completion rate as a percentage (0.0 to 100.0).
    pub fn completion_rate(&self) -> f64 {
        if self.total_analyses == 0 {
            0.0
        } else {
            (self.completed_analyses as f64 / self.total_analyses as f64) * 100.0
        }
    }

    /// Returns the failure rate as a percentage (0.0 to 100.0).
    pub fn failure_rate(&self) -> f64 {
        if self.total_analyses == 0 {
            0.0
        } else {
            (self.failed_analyses as f64 / self.total_analyses as f64) * 100.0
        }
    }

    /// Returns the share of completed analyses flagged as manipulated,
    /// as a percentage (0.0 to 100.0).
    pub fn manipulation_rate(&self) -> f64 {
        if self.completed_analyses == 0 {
            0.0
        } else {
            (self.manipulated_verdicts as f64 / self.completed_analyses as f64) * 100.0
        }
    }

    /// Returns the average processing speed in analyses per second.
    pub fn analyses_per_second(&self) -> f64 {
        if self.average_latency_ms == 0.0 {
            0.0
        } else {
            1000.0 / self.average_latency_ms
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Statistics:")?;
        writeln!(f, "  Total analyses: {}", self.total_analyses)?;
        writeln!(
            f,
            "  Completed: {} ({:.1}%)",
            self.completed_analyses,
            self.completion_rate()
        )?;
        writeln!(
            f,
            "  Failed: {} ({:.1}%)",
            self.failed_analyses,
            self.failure_rate()
        )?;
        writeln!(
            f,
            "  Manipulated verdicts: {} ({:.1}%)",
            self.manipulated_verdicts,
            self.manipulation_rate()
        )?;
        writeln!(f, "  Authentic verdicts: {}", self.authentic_verdicts)?;
        writeln!(f, "  Average latency: {:.2} ms", self.average_latency_ms)?;
        writeln!(
            f,
            "  Processing speed: {:.2} analyses/sec",
            self.analyses_per_second()
        )?;
        Ok(())
    }
}

/// Thread-safe manager for updating pipeline statistics during analysis runs.
#[derive(Debug, Default)]
pub struct StatsManager {
    /// Shared statistics state guarded by a mutex.
    stats: Mutex<PipelineStats>,
}

impl StatsManager {
    /// Creates a new `StatsManager` instance with zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current statistics snapshot.
    pub fn get_stats(&self) -> PipelineStats {
        self.stats.lock().unwrap().clone()
    }

    /// Records an analysis that produced a verdict.
    pub fn record_completed(&self, is_manipulated: bool, latency_ms: f64) {
        let mut stats = self.stats.lock().unwrap();
        stats.completed_analyses += 1;
        if is_manipulated {
            stats.manipulated_verdicts += 1;
        } else {
            stats.authentic_verdicts += 1;
        }
        Self::fold_latency(&mut stats, latency_ms);
    }

    /// Records an analysis that ended in an error.
    pub fn record_failed(&self, latency_ms: f64) {
        let mut stats = self.stats.lock().unwrap();
        stats.failed_analyses += 1;
        Self::fold_latency(&mut stats, latency_ms);
    }

    fn fold_latency(stats: &mut PipelineStats, latency_ms: f64) {
        let previous_total = stats.total_analyses;
        let previous_average = stats.average_latency_ms;
        let new_total = previous_total + 1;

        stats.total_analyses = new_total;

        let accumulated_time = previous_average * previous_total as f64;
        stats.average_latency_ms = (accumulated_time + latency_ms) / new_total as f64;
    }

    /// Resets the tracked statistics to their default state.
    pub fn reset_stats(&self) {
        let mut stats = self.stats.lock().unwrap();
        *stats = PipelineStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{PipelineStats, StatsManager};

    #[test]
    fn completion_rate_handles_zero_analyses() {
        let stats = PipelineStats::default();
        assert_eq!(stats.completion_rate(), 0.0);
    }

    #[test]
    fn completion_rate_computes_percentage() {
        let stats = PipelineStats {
            total_analyses: 10,
            completed_analyses: 7,
            failed_analyses: 3,
            manipulated_verdicts: 4,
            authentic_verdicts: 3,
            average_latency_ms: 50.0,
        };
        assert_eq!(stats.completion_rate(), 70.0);
    }

    #[test]
    fn manipulation_rate_is_relative_to_completed_runs() {
        let stats = PipelineStats {
            total_analyses: 10,
            completed_analyses: 4,
            failed_analyses: 6,
            manipulated_verdicts: 3,
            authentic_verdicts: 1,
            average_latency_ms: 50.0,
        };
        assert_eq!(stats.manipulation_rate(), 75.0);
    }

    #[test]
    fn analyses_per_second_handles_zero_latency() {
        let stats = PipelineStats::default();
        assert_eq!(stats.analyses_per_second(), 0.0);
    }

    #[test]
    fn display_formats_metrics() {
        let stats = PipelineStats {
            total_analyses: 10,
            completed_analyses: 8,
            failed_analyses: 2,
            manipulated_verdicts: 5,
            authentic_verdicts: 3,
            average_latency_ms: 125.0,
        };

        let display = stats.to_string();
        assert!(display.contains("Pipeline Statistics:"));
        assert!(display.contains("Total analyses: 10"));
        assert!(display.contains("Completed: 8 (80.0%)"));
        assert!(display.contains("Failed: 2 (20.0%)"));
        assert!(display.contains("Manipulated verdicts: 5 (62.5%)"));
        assert!(display.contains("Average latency: 125.00 ms"));
        assert!(display.contains("Processing speed: 8.00 analyses/sec"));
    }

    #[test]
    fn manager_folds_latency_into_running_average() {
        let manager = StatsManager::new();

        manager.record_completed(true, 100.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_analyses, 1);
        assert_eq!(stats.completed_analyses, 1);
        assert_eq!(stats.manipulated_verdicts, 1);
        assert_eq!(stats.average_latency_ms, 100.0);

        manager.record_failed(200.0);
        let stats = manager.get_stats();
        assert_eq!(stats.total_analyses, 2);
        assert_eq!(stats.failed_analyses, 1);
        assert!((stats.average_latency_ms - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn manager_splits_verdict_counters() {
        let manager = StatsManager::new();
        manager.record_completed(true, 10.0);
        manager.record_completed(false, 10.0);
        manager.record_completed(false, 10.0);

        let stats = manager.get_stats();
        assert_eq!(stats.manipulated_verdicts, 1);
        assert_eq!(stats.authentic_verdicts, 2);
        assert_eq!(stats.completed_analyses, 3);
    }

    #[test]
    fn manager_resets_metrics() {
        let manager = StatsManager::new();
        manager.record_completed(true, 500.0);
        manager.record_failed(100.0);
        manager.reset_stats();

        let stats = manager.get_stats();
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.completed_analyses, 0);
        assert_eq!(stats.failed_analyses, 0);
        assert_eq!(stats.average_latency_ms, 0.0);
    }
}
