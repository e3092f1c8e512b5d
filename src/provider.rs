//! Injectable data-access boundary.
//!
//! The engine never touches a store directly. Whatever persists revisions,
//! exams, momentum and alerts implements [`RevisionHistoryProvider`] and hands
//! the engine pre-aggregated, read-only value objects. This keeps every
//! computation testable against in-memory fixtures.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-topic rollup of a user's revision history.
///
/// `last_revised_at` is `None` for a topic that was registered but never
/// actually revised; see the curve module for how such topics are treated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionAggregate {
    pub topic: String,
    /// Number of revision sessions logged for this topic.
    pub count: u32,
    /// Total minutes spent across those sessions.
    pub total_minutes: u32,
    /// Mean self-rated confidence, 1..=5.
    pub avg_confidence: f64,
    pub last_revised_at: Option<DateTime<Utc>>,
}

/// The next scheduled exam, if the user has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamInfo {
    pub label: String,
    pub exam_date: DateTime<Utc>,
}

/// Failure inside the external data provider. The engine performs no retries;
/// it wraps this into [`crate::engine::EngineError::Infrastructure`] and
/// returns to the caller.
#[derive(Debug, Clone, Error)]
#[error("history provider failure: {message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Read-side collaborator supplying everything the engine consumes per user.
///
/// Implementations are expected to be cheap, bounded calls (the aggregates
/// are the result of a single rollup query); any blocking or timeout policy
/// lives behind this trait, not in the engine.
pub trait RevisionHistoryProvider {
    /// One aggregate row per topic the user has ever registered.
    fn topic_aggregates(&self, user_id: &str) -> Result<Vec<RevisionAggregate>, ProviderError>;

    /// The next upcoming exam, or `None` when unscheduled.
    fn next_exam(&self, user_id: &str) -> Result<Option<ExamInfo>, ProviderError>;

    /// Current momentum score (non-negative scalar maintained by the caller).
    fn momentum_score(&self, user_id: &str) -> Result<f64, ProviderError>;

    /// Titles of alerts already created for this user on the given calendar
    /// day. Used for same-day alert deduplication.
    fn alert_titles_for_day(
        &self,
        user_id: &str,
        day: NaiveDate,
    ) -> Result<HashSet<String>, ProviderError>;
}
