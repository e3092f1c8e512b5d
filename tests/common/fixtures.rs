use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use revision_engine::provider::{
    ExamInfo, ProviderError, RevisionAggregate, RevisionHistoryProvider,
};

/// In-memory history provider: the engine's data dependency reduced to plain
/// fields, so flows can be tested without any store.
#[derive(Debug, Default, Clone)]
pub struct FixtureHistory {
    pub aggregates: Vec<RevisionAggregate>,
    pub exam: Option<ExamInfo>,
    pub momentum: f64,
    pub alert_titles_today: HashSet<String>,
    pub fail_with: Option<String>,
}

impl FixtureHistory {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), ProviderError> {
        match &self.fail_with {
            Some(msg) => Err(ProviderError::new(msg.clone())),
            None => Ok(()),
        }
    }
}

impl RevisionHistoryProvider for FixtureHistory {
    fn topic_aggregates(&self, _user_id: &str) -> Result<Vec<RevisionAggregate>, ProviderError> {
        self.check()?;
        Ok(self.aggregates.clone())
    }

    fn next_exam(&self, _user_id: &str) -> Result<Option<ExamInfo>, ProviderError> {
        self.check()?;
        Ok(self.exam.clone())
    }

    fn momentum_score(&self, _user_id: &str) -> Result<f64, ProviderError> {
        self.check()?;
        Ok(self.momentum)
    }

    fn alert_titles_for_day(
        &self,
        _user_id: &str,
        _day: NaiveDate,
    ) -> Result<HashSet<String>, ProviderError> {
        self.check()?;
        Ok(self.alert_titles_today.clone())
    }
}

pub fn aggregate(
    topic: &str,
    count: u32,
    total_minutes: u32,
    avg_confidence: f64,
    last_revised_at: Option<DateTime<Utc>>,
) -> RevisionAggregate {
    RevisionAggregate {
        topic: topic.to_string(),
        count,
        total_minutes,
        avg_confidence,
        last_revised_at,
    }
}

/// A learner mid-way through revision: a mix of fresh, stale and weak topics.
pub fn seed_history(now: DateTime<Utc>) -> FixtureHistory {
    FixtureHistory {
        aggregates: vec![
            aggregate("mechanics", 4, 120, 4.2, Some(now - Duration::days(1))),
            aggregate("thermodynamics", 2, 50, 3.0, Some(now - Duration::days(9))),
            aggregate("optics", 1, 20, 1.9, Some(now - Duration::days(16))),
            aggregate("waves", 3, 75, 2.1, Some(now - Duration::days(3))),
            aggregate("relativity", 0, 0, 3.0, None),
        ],
        exam: Some(ExamInfo {
            label: "physics-final".to_string(),
            exam_date: now + Duration::days(12),
        }),
        momentum: 8.0,
        alert_titles_today: HashSet::new(),
        fail_with: None,
    }
}
