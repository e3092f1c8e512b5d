//! Retention-modeling and scheduling engine for study planning.
//!
//! Models how much of previously studied material is likely still retained
//! (a per-topic forgetting curve), aggregates that signal into an exam
//! readiness score, packs the most urgent topics into a time-boxed daily
//! plan, schedules flashcard reviews (SM-2 style), and derives overdue /
//! weak-topic alerts from the same revision aggregates.
//!
//! The engine is stateless pure computation per invocation. Historical data
//! comes in through [`provider::RevisionHistoryProvider`]; results go back to
//! the caller as plain structured data to persist or render.

pub mod constants;
pub mod engine;
pub mod logging;
pub mod provider;

pub use engine::{EngineError, StudyEngine};
pub use provider::{ExamInfo, ProviderError, RevisionAggregate, RevisionHistoryProvider};
