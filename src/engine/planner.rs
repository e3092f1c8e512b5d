//! Daily study plan.
//!
//! Ranks topics by urgency (retention deficit + confidence deficit + exam
//! proximity) and packs the top candidates into time-boxed blocks under a
//! minutes budget. Uses a lightweight retention proxy rather than the full
//! curve model, so a plan can be built straight from the aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MILLIS_PER_DAY;
use crate::engine::config::EngineConfig;
use crate::engine::curve::days_since;
use crate::provider::{ExamInfo, RevisionAggregate};

const RETENTION_DEFICIT_WEIGHT: f64 = 70.0;
const CONFIDENCE_DEFICIT_WEIGHT: f64 = 20.0;
const EXAM_PRESSURE_WEIGHT: f64 = 10.0;
const DECAY_BASE_DAYS: f64 = 2.5;
const DECAY_REP_GAIN: f64 = 0.9;
const RETENTION_CONF_BASE: f64 = 0.7;
const RETENTION_CONF_SCALE: f64 = 0.6;
const EXAM_PRESSURE_BASE: f64 = 1.2;
const EXAM_PRESSURE_SLOPE_DAYS: f64 = 60.0;
const EXAM_PRESSURE_MIN: f64 = 0.6;
const EXAM_PRESSURE_MAX: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBlock {
    pub topic: String,
    pub minutes: u32,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub blocks: Vec<PlanBlock>,
    /// Minutes actually allocated; never exceeds the requested budget.
    pub total_minutes: u32,
}

#[derive(Debug, Clone)]
struct TopicUrgency {
    topic: String,
    retention: f64,
    avg_confidence: f64,
    urgency: f64,
}

fn exam_days(exam: Option<&ExamInfo>, now: DateTime<Utc>, config: &EngineConfig) -> f64 {
    match exam {
        Some(e) => ((e.exam_date - now).num_milliseconds() as f64 / MILLIS_PER_DAY)
            .ceil()
            .max(0.0),
        None => config.default_exam_horizon_days,
    }
}

fn rank_topics(
    aggregates: &[RevisionAggregate],
    exam: Option<&ExamInfo>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<TopicUrgency> {
    let days_to_exam = exam_days(exam, now, config);
    let exam_pressure = (EXAM_PRESSURE_BASE - days_to_exam / EXAM_PRESSURE_SLOPE_DAYS)
        .clamp(EXAM_PRESSURE_MIN, EXAM_PRESSURE_MAX);

    let mut ranked: Vec<TopicUrgency> = aggregates
        .iter()
        .filter_map(|agg| {
            // No decay origin for a never-revised topic; it cannot be ranked.
            let last = agg.last_revised_at?;
            let elapsed = days_since(now, last);

            let decay =
                (-elapsed / (DECAY_BASE_DAYS + f64::from(agg.count) * DECAY_REP_GAIN)).exp();
            let retention = (decay
                * (RETENTION_CONF_BASE + agg.avg_confidence / 5.0 * RETENTION_CONF_SCALE))
                .clamp(0.0, 1.0);

            let urgency = (1.0 - retention) * RETENTION_DEFICIT_WEIGHT
                + (1.0 - agg.avg_confidence / 5.0) * CONFIDENCE_DEFICIT_WEIGHT
                + exam_pressure * EXAM_PRESSURE_WEIGHT;

            Some(TopicUrgency {
                topic: agg.topic.clone(),
                retention,
                avg_confidence: agg.avg_confidence,
                // Two-decimal ranking keeps plan output reproducible.
                urgency: (urgency * 100.0).round() / 100.0,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.urgency
            .partial_cmp(&a.urgency)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Pack the most urgent topics into time-boxed blocks.
///
/// Block sizes cycle through the configured preferences, each clipped to the
/// remaining budget; one block per topic, at most `max_plan_topics` topics.
pub fn build_plan(
    aggregates: &[RevisionAggregate],
    exam: Option<&ExamInfo>,
    minutes_available: u32,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> DailyPlan {
    let ranked = rank_topics(aggregates, exam, now, config);
    tracing::debug!(
        candidates = ranked.len(),
        minutes_available,
        "Ranked topics for daily plan"
    );

    let mut blocks = Vec::new();
    let mut remaining = minutes_available;

    for (idx, t) in ranked.iter().take(config.max_plan_topics).enumerate() {
        if remaining == 0 {
            break;
        }
        let preferred = config.block_sizes[idx % config.block_sizes.len()];
        let size = preferred.min(remaining);
        blocks.push(PlanBlock {
            topic: t.topic.clone(),
            minutes: size,
            priority: if idx == 0 {
                Priority::High
            } else {
                Priority::Medium
            },
            reason: format!(
                "Urgency {:.2} • retention {:.0}% • confidence {:.1}",
                t.urgency,
                t.retention * 100.0,
                t.avg_confidence
            ),
        });
        remaining -= size;
    }

    let total_minutes = minutes_available - remaining;
    DailyPlan {
        blocks,
        total_minutes,
    }
}

/// Even-split sequence over the user's lowest-confidence topics.
///
/// Companion to [`build_plan`] for "just drill my weak spots" sessions:
/// topics under the confidence cutoff, weakest first, each given an equal
/// share of the target minutes.
pub fn weak_topic_sequence(
    aggregates: &[RevisionAggregate],
    target_minutes: u32,
    config: &EngineConfig,
) -> DailyPlan {
    let mut weak: Vec<&RevisionAggregate> = aggregates
        .iter()
        .filter(|a| a.avg_confidence < config.weak_confidence_cutoff)
        .collect();
    weak.sort_by(|a, b| {
        a.avg_confidence
            .partial_cmp(&b.avg_confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    weak.truncate(config.weak_sequence_limit);

    if weak.is_empty() {
        return DailyPlan {
            blocks: Vec::new(),
            total_minutes: 0,
        };
    }

    let share = (f64::from(target_minutes) / weak.len() as f64).round() as u32;
    let blocks: Vec<PlanBlock> = weak
        .iter()
        .enumerate()
        .map(|(idx, a)| PlanBlock {
            topic: a.topic.clone(),
            minutes: share,
            priority: if idx == 0 {
                Priority::High
            } else {
                Priority::Medium
            },
            reason: format!("Low confidence ({:.1})", a.avg_confidence),
        })
        .collect();

    let total_minutes = blocks.iter().map(|b| b.minutes).sum();
    DailyPlan {
        blocks,
        total_minutes,
    }
}
