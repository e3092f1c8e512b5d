//! Per-topic forgetting curve.
//!
//! Exponential decay `retention(t) = exp(-t / tau)` with a time constant that
//! grows with revision count, cumulative minutes and self-rated confidence.
//! A topic becomes due when retention falls below the configured threshold.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_CURVE_HORIZON_DAYS, MILLIS_PER_DAY};
use crate::engine::config::EngineConfig;
use crate::provider::RevisionAggregate;

const TAU_BASE_DAYS: f64 = 2.5;
const COUNT_BOOST_STEP: f64 = 0.65;
const COUNT_BOOST_CAP: f64 = 3.0;
const TIME_BOOST_STEP: f64 = 0.25;
const TIME_BOOST_CAP_HOURS: f64 = 6.0;
const CONF_BOOST_BASE: f64 = 0.75;
const CONF_BOOST_SCALE: f64 = 0.65;

/// One charted point of a topic's curve, at a day offset relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub offset_days: i32,
    pub retention: f64,
}

/// Derived retention state for one topic. Recomputed on every call, never
/// persisted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicModel {
    pub topic: String,
    pub rev_count: u32,
    pub total_minutes: u32,
    pub avg_confidence: f64,
    pub last_revised_at: DateTime<Utc>,
    pub tau_days: f64,
    pub current_retention: f64,
    pub next_review_at: DateTime<Utc>,
    pub curve: Vec<CurvePoint>,
}

/// Decay time constant in days. More revisions, more cumulative time and
/// higher confidence all slow forgetting.
pub fn compute_tau(count: u32, total_minutes: u32, avg_confidence: f64) -> f64 {
    let count_boost = 1.0 + f64::from(count).min(COUNT_BOOST_CAP) * COUNT_BOOST_STEP;
    let time_boost =
        1.0 + (f64::from(total_minutes) / 60.0).min(TIME_BOOST_CAP_HOURS) * TIME_BOOST_STEP;
    let conf_boost = CONF_BOOST_BASE + avg_confidence.clamp(1.0, 5.0) / 5.0 * CONF_BOOST_SCALE;
    TAU_BASE_DAYS * count_boost * time_boost * conf_boost
}

/// Modeled recall probability after `t_days` of not revising.
pub fn retention_at_days(t_days: f64, tau_days: f64) -> f64 {
    (-t_days.max(0.0) / tau_days).exp().clamp(0.0, 1.0)
}

/// Days after a revision until retention drops to `threshold`.
/// `threshold = exp(-t/tau)  =>  t = -tau ln(threshold)`
pub fn days_until_threshold(tau_days: f64, threshold: f64) -> f64 {
    -tau_days * threshold.ln()
}

/// Elapsed days between two instants, floored at zero.
pub(crate) fn days_since(now: DateTime<Utc>, then: DateTime<Utc>) -> f64 {
    ((now - then).num_milliseconds() as f64 / MILLIS_PER_DAY).max(0.0)
}

/// Build the full derived model for one topic aggregate.
///
/// Returns `None` for a topic that was never revised (`last_revised_at` is
/// `None`): without a timestamp there is no decay origin, so such topics are
/// excluded from retention modeling, overdue detection and the daily plan
/// rather than given an invented retention value.
pub fn compute_topic_model(
    agg: &RevisionAggregate,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Option<TopicModel> {
    let last = agg.last_revised_at?;

    let tau = compute_tau(agg.count, agg.total_minutes, agg.avg_confidence);
    let elapsed = days_since(now, last);
    let current_retention = retention_at_days(elapsed, tau);

    let target_days = days_until_threshold(tau, config.retention_threshold);
    let next_review_at = last + Duration::milliseconds((target_days * MILLIS_PER_DAY) as i64);

    let curve = (-config.curve_window_days..=config.curve_window_days)
        .map(|i| {
            let d = (elapsed + f64::from(i)).clamp(0.0, MAX_CURVE_HORIZON_DAYS);
            CurvePoint {
                offset_days: i,
                retention: retention_at_days(d, tau),
            }
        })
        .collect();

    Some(TopicModel {
        topic: agg.topic.clone(),
        rev_count: agg.count,
        total_minutes: agg.total_minutes,
        avg_confidence: agg.avg_confidence,
        last_revised_at: last,
        tau_days: tau,
        current_retention,
        next_review_at,
        curve,
    })
}
