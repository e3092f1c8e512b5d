//! Exam readiness score.
//!
//! Combines 14-day topic coverage, average modeled retention and momentum
//! into a 0-100 composite, minus a penalty for overdue topics that grows as
//! the exam approaches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MILLIS_PER_DAY;
use crate::engine::config::EngineConfig;
use crate::engine::curve::TopicModel;
use crate::provider::ExamInfo;

const COVERAGE_WEIGHT: f64 = 0.45;
const RETENTION_WEIGHT: f64 = 0.35;
const MOMENTUM_WEIGHT: f64 = 0.20;
const MOMENTUM_SCALE: f64 = 4.0;
const OVERDUE_PENALTY_PER_TOPIC: f64 = 3.0;
const OVERDUE_PENALTY_MAX: f64 = 30.0;
const EXAM_FACTOR_BASE: f64 = 1.2;
const EXAM_FACTOR_SLOPE_DAYS: f64 = 60.0;
const EXAM_FACTOR_MIN: f64 = 0.6;
const EXAM_FACTOR_MAX: f64 = 1.2;
/// Average retention reported when the user has no modeled topics yet.
const NO_TOPICS_RETENTION: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessSummary {
    pub readiness: u32,
    pub coverage_14d: u32,
    pub avg_retention: f64,
    pub overdue_count: u32,
    pub momentum_score: f64,
}

/// Topics past their next-review time, worst retention first, capped.
pub fn overdue_topics<'a>(
    topic_models: &'a [TopicModel],
    now: DateTime<Utc>,
    cap: usize,
) -> Vec<&'a TopicModel> {
    let mut overdue: Vec<&TopicModel> = topic_models
        .iter()
        .filter(|m| m.next_review_at <= now)
        .collect();
    overdue.sort_by(|a, b| {
        a.current_retention
            .partial_cmp(&b.current_retention)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    overdue.truncate(cap);
    overdue
}

/// Pure function of its inputs; no side effects.
#[allow(clippy::too_many_arguments)]
pub fn compute_readiness(
    topic_models: &[TopicModel],
    active_topic_count: usize,
    total_topic_count: usize,
    momentum_score: f64,
    exam: Option<&ExamInfo>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> ReadinessSummary {
    // Denominator defaults to 1 so a user with zero topics gets 0% coverage
    // instead of a division by zero.
    let coverage_14d = ((active_topic_count as f64 / total_topic_count.max(1) as f64) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u32;

    let avg_retention = if topic_models.is_empty() {
        NO_TOPICS_RETENTION
    } else {
        topic_models
            .iter()
            .map(|m| m.current_retention)
            .sum::<f64>()
            / topic_models.len() as f64
    };

    let overdue_count = overdue_topics(topic_models, now, config.overdue_list_cap).len();

    let days_to_exam = exam.map(|e| {
        ((e.exam_date - now).num_milliseconds() as f64 / MILLIS_PER_DAY)
            .ceil()
            .max(0.0)
    });
    let exam_factor = match days_to_exam {
        None => 1.0,
        Some(d) => (EXAM_FACTOR_BASE - d / EXAM_FACTOR_SLOPE_DAYS)
            .clamp(EXAM_FACTOR_MIN, EXAM_FACTOR_MAX),
    };
    let overdue_penalty = (overdue_count as f64 * OVERDUE_PENALTY_PER_TOPIC * exam_factor)
        .clamp(0.0, OVERDUE_PENALTY_MAX);

    let score = COVERAGE_WEIGHT * f64::from(coverage_14d)
        + RETENTION_WEIGHT * (avg_retention * 100.0).round()
        + MOMENTUM_WEIGHT * (momentum_score * MOMENTUM_SCALE).clamp(0.0, 100.0);

    let readiness = (score - overdue_penalty).round().clamp(0.0, 100.0) as u32;

    ReadinessSummary {
        readiness,
        coverage_14d,
        avg_retention,
        overdue_count: overdue_count as u32,
        momentum_score,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::engine::curve::compute_topic_model;
    use crate::provider::RevisionAggregate;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn model(topic: &str, days_ago: i64, conf: f64) -> TopicModel {
        let agg = RevisionAggregate {
            topic: topic.to_string(),
            count: 1,
            total_minutes: 20,
            avg_confidence: conf,
            last_revised_at: Some(now() - Duration::days(days_ago)),
        };
        compute_topic_model(&agg, now(), &EngineConfig::default()).expect("model")
    }

    #[test]
    fn empty_user_gets_neutral_defaults() {
        let cfg = EngineConfig::default();
        let summary = compute_readiness(&[], 0, 0, 0.0, None, now(), &cfg);
        assert_eq!(summary.coverage_14d, 0);
        assert_eq!(summary.avg_retention, 0.5);
        assert_eq!(summary.overdue_count, 0);
        assert!(summary.readiness <= 100);
    }

    #[test]
    fn readiness_is_clamped_to_percent_range() {
        let cfg = EngineConfig::default();
        let models: Vec<TopicModel> = (0..20).map(|i| model(&format!("t{i}"), 40, 1.0)).collect();
        let low = compute_readiness(&models, 0, 20, 0.0, None, now(), &cfg);
        assert!(low.readiness <= 100);

        let fresh: Vec<TopicModel> = (0..5).map(|i| model(&format!("t{i}"), 0, 5.0)).collect();
        let high = compute_readiness(&fresh, 5, 5, 100.0, None, now(), &cfg);
        assert!(high.readiness <= 100);
        assert!(high.readiness > low.readiness);
    }

    #[test]
    fn overdue_list_is_capped_and_sorted_worst_first() {
        let models: Vec<TopicModel> =
            (0..15).map(|i| model(&format!("t{i}"), 20 + i, 2.0)).collect();
        let overdue = overdue_topics(&models, now(), 10);
        assert_eq!(overdue.len(), 10);
        for pair in overdue.windows(2) {
            assert!(pair[0].current_retention <= pair[1].current_retention);
        }
    }

    #[test]
    fn close_exam_amplifies_overdue_penalty() {
        let cfg = EngineConfig::default();
        let models: Vec<TopicModel> = (0..5).map(|i| model(&format!("t{i}"), 30, 3.0)).collect();
        let soon = ExamInfo {
            label: "finals".to_string(),
            exam_date: now() + Duration::days(3),
        };
        let far = ExamInfo {
            label: "finals".to_string(),
            exam_date: now() + Duration::days(120),
        };
        let under_pressure =
            compute_readiness(&models, 2, 5, 5.0, Some(&soon), now(), &cfg);
        let relaxed = compute_readiness(&models, 2, 5, 5.0, Some(&far), now(), &cfg);
        assert!(under_pressure.readiness <= relaxed.readiness);
    }

    #[test]
    fn golden_weights() {
        // coverage 50, avg retention forced via no topics (0.5 -> 50),
        // momentum 10 -> 40 after scaling: 0.45*50 + 0.35*50 + 0.20*40 = 48
        let cfg = EngineConfig::default();
        let summary = compute_readiness(&[], 1, 2, 10.0, None, now(), &cfg);
        assert_eq!(summary.coverage_14d, 50);
        assert_eq!(summary.readiness, 48);
    }
}
