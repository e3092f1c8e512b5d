use serde::{Deserialize, Serialize};

/// Product-tunable knobs for the engine.
///
/// Only thresholds, caps and window sizes live here. The decay boosts,
/// urgency weights and SM-2 update rule are fixed product tuning and stay as
/// constants in their modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Retention level at which a topic becomes due for review.
    pub retention_threshold: f64,
    /// Half-width of the charted forgetting curve, in days around "now".
    pub curve_window_days: i32,
    /// Window for the coverage metric: topics revised within this many days
    /// count as active.
    pub coverage_window_days: i64,
    /// At most this many overdue topics are reported (lowest retention first).
    pub overdue_list_cap: usize,
    /// Exam horizon assumed when no exam is scheduled, in days.
    pub default_exam_horizon_days: f64,
    /// At most this many topics make it into a daily plan.
    pub max_plan_topics: usize,
    /// Block-size preferences cycled through while packing the plan.
    pub block_sizes: Vec<u32>,
    /// Confidence below which a topic qualifies for the weak-topic sequence.
    pub weak_confidence_cutoff: f64,
    /// At most this many topics in the weak-topic sequence.
    pub weak_sequence_limit: usize,
    /// Days since last revision after which an overdue alert fires.
    pub overdue_after_days: f64,
    /// Average confidence at or below which a weak-topic alert fires.
    pub weak_alert_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retention_threshold: 0.72,
            curve_window_days: 14,
            coverage_window_days: 14,
            overdue_list_cap: 10,
            default_exam_horizon_days: 30.0,
            max_plan_topics: 8,
            block_sizes: vec![25, 25, 20, 15, 10],
            weak_confidence_cutoff: 3.0,
            weak_sequence_limit: 5,
            overdue_after_days: 7.0,
            weak_alert_confidence: 2.2,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.retention_threshold > 0.0 && self.retention_threshold < 1.0) {
            return Err(format!(
                "retention_threshold must be in (0, 1), got {}",
                self.retention_threshold
            ));
        }
        if self.curve_window_days < 0 {
            return Err("curve_window_days must be non-negative".to_string());
        }
        if self.coverage_window_days <= 0 {
            return Err("coverage_window_days must be positive".to_string());
        }
        if self.default_exam_horizon_days <= 0.0 {
            return Err("default_exam_horizon_days must be positive".to_string());
        }
        if self.max_plan_topics == 0 {
            return Err("max_plan_topics must be at least 1".to_string());
        }
        if self.block_sizes.is_empty() || self.block_sizes.iter().any(|&b| b == 0) {
            return Err("block_sizes must be non-empty with positive entries".to_string());
        }
        if self.weak_sequence_limit == 0 {
            return Err("weak_sequence_limit must be at least 1".to_string());
        }
        if self.overdue_after_days <= 0.0 {
            return Err("overdue_after_days must be positive".to_string());
        }
        Ok(())
    }
}
