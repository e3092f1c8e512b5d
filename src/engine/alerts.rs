//! Overdue and weak-topic alerts.
//!
//! Derived from the same revision aggregates as the curve model, with
//! same-calendar-day title deduplication so a refresh can run repeatedly
//! within a day without spamming the user.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::config::EngineConfig;
use crate::engine::curve::days_since;
use crate::provider::RevisionAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    Overdue,
    Weak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMeta {
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub topic: String,
    pub title: String,
    pub body: String,
    pub meta: AlertMeta,
    pub created_at: DateTime<Utc>,
}

/// Derive fresh alerts from the aggregates.
///
/// An alert is suppressed when `existing_titles_today` already contains its
/// title, which makes the operation idempotent at daily granularity. Topics
/// without a revision timestamp skip the overdue check (no elapsed time to
/// measure) but stay eligible for the weak-confidence alert.
pub fn refresh(
    aggregates: &[RevisionAggregate],
    existing_titles_today: &HashSet<String>,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let mut suppressed = 0u32;

    let mut push = |alert: Alert| {
        if existing_titles_today.contains(&alert.title) {
            suppressed += 1;
        } else {
            alerts.push(alert);
        }
    };

    for agg in aggregates {
        if let Some(last) = agg.last_revised_at {
            let days = days_since(now, last);
            if days >= config.overdue_after_days {
                let whole_days = days.floor() as i64;
                push(Alert {
                    id: Uuid::new_v4(),
                    kind: AlertKind::Overdue,
                    topic: agg.topic.clone(),
                    title: format!("Overdue: {}", agg.topic),
                    body: format!(
                        "You haven't revised this topic in {whole_days} days."
                    ),
                    meta: AlertMeta {
                        topic: agg.topic.clone(),
                        days: Some(whole_days),
                        confidence: None,
                    },
                    created_at: now,
                });
            }
        }

        if agg.avg_confidence <= config.weak_alert_confidence {
            push(Alert {
                id: Uuid::new_v4(),
                kind: AlertKind::Weak,
                topic: agg.topic.clone(),
                title: format!("Weak topic: {}", agg.topic),
                body: format!(
                    "Your average confidence is {:.1}. Consider revising with a different method.",
                    agg.avg_confidence
                ),
                meta: AlertMeta {
                    topic: agg.topic.clone(),
                    days: None,
                    confidence: Some(agg.avg_confidence),
                },
                created_at: now,
            });
        }
    }

    if suppressed > 0 {
        tracing::debug!(suppressed, "Alert refresh: suppressed same-day duplicates");
    }
    alerts
}
