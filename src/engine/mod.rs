//! Engine facade: wires the pure scheduling modules to a history provider.

pub mod alerts;
pub mod config;
pub mod curve;
pub mod planner;
pub mod readiness;
pub mod scheduler;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::provider::{ProviderError, RevisionHistoryProvider};
use alerts::Alert;
use config::EngineConfig;
use curve::TopicModel;
use planner::DailyPlan;
use readiness::ReadinessSummary;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Infrastructure(#[from] ProviderError),
}

/// Stateless computation service over an injected [`RevisionHistoryProvider`].
///
/// Every method fetches the aggregates it needs, runs the pure module
/// functions and returns plain data; nothing is cached or persisted here.
/// Provider failures surface as [`EngineError::Infrastructure`] without
/// retries.
pub struct StudyEngine<P> {
    config: EngineConfig,
    provider: P,
}

impl<P: RevisionHistoryProvider> StudyEngine<P> {
    pub fn new(config: EngineConfig, provider: P) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Validation)?;
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forgetting-curve models for every topic with at least one revision.
    pub fn topic_models(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<TopicModel>, EngineError> {
        let aggregates = self.provider.topic_aggregates(user_id)?;
        let models: Vec<TopicModel> = aggregates
            .iter()
            .filter_map(|agg| curve::compute_topic_model(agg, now, &self.config))
            .collect();
        tracing::debug!(
            user_id,
            topics = aggregates.len(),
            modeled = models.len(),
            "Computed topic models"
        );
        Ok(models)
    }

    /// Readiness summary for the user's next exam (or open-ended study).
    pub fn readiness(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReadinessSummary, EngineError> {
        let aggregates = self.provider.topic_aggregates(user_id)?;
        let exam = self.provider.next_exam(user_id)?;
        let momentum = self.provider.momentum_score(user_id)?;

        let models: Vec<TopicModel> = aggregates
            .iter()
            .filter_map(|agg| curve::compute_topic_model(agg, now, &self.config))
            .collect();

        let active_cutoff = now - Duration::days(self.config.coverage_window_days);
        let active = aggregates
            .iter()
            .filter(|a| a.last_revised_at.is_some_and(|t| t >= active_cutoff))
            .count();

        let summary = readiness::compute_readiness(
            &models,
            active,
            aggregates.len(),
            momentum,
            exam.as_ref(),
            now,
            &self.config,
        );
        tracing::info!(
            user_id,
            readiness = summary.readiness,
            coverage = summary.coverage_14d,
            overdue = summary.overdue_count,
            "Computed readiness"
        );
        Ok(summary)
    }

    /// Time-boxed plan for today under the given minutes budget.
    pub fn daily_plan(
        &self,
        user_id: &str,
        minutes_available: u32,
        now: DateTime<Utc>,
    ) -> Result<DailyPlan, EngineError> {
        let aggregates = self.provider.topic_aggregates(user_id)?;
        let exam = self.provider.next_exam(user_id)?;
        let plan = planner::build_plan(&aggregates, exam.as_ref(), minutes_available, now, &self.config);
        tracing::info!(
            user_id,
            blocks = plan.blocks.len(),
            total_minutes = plan.total_minutes,
            "Built daily plan"
        );
        Ok(plan)
    }

    /// Even-split drill sequence over the lowest-confidence topics.
    pub fn weak_topic_sequence(
        &self,
        user_id: &str,
        target_minutes: u32,
    ) -> Result<DailyPlan, EngineError> {
        let aggregates = self.provider.topic_aggregates(user_id)?;
        Ok(planner::weak_topic_sequence(
            &aggregates,
            target_minutes,
            &self.config,
        ))
    }

    /// Generate today's new alerts, suppressing titles already created today.
    /// Safe to call repeatedly within a day.
    pub fn refresh_alerts(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Alert>, EngineError> {
        let aggregates = self.provider.topic_aggregates(user_id)?;
        let existing = self
            .provider
            .alert_titles_for_day(user_id, now.date_naive())?;
        let alerts = alerts::refresh(&aggregates, &existing, now, &self.config);
        tracing::info!(user_id, created = alerts.len(), "Refreshed alerts");
        Ok(alerts)
    }
}
