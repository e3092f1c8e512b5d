//! Flashcard review scheduling (SM-2 style).
//!
//! A continuous numeric transform, not a state machine: each rating maps the
//! card's (interval, repetitions, ease factor) triple to its successor.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EASE_FACTOR, MILLIS_PER_DAY};
use crate::engine::EngineError;

/// Interval floor, roughly one minute: an "Again" card comes straight back.
pub const MIN_INTERVAL_DAYS: f64 = 0.0007;
pub const MIN_EASE_FACTOR: f64 = 1.3;
const AGAIN_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const HARD_INTERVAL_MULTIPLIER: f64 = 1.2;
const EASY_EASE_BONUS: f64 = 0.15;
const EASY_INTERVAL_BONUS: f64 = 1.3;
const FIRST_GOOD_INTERVAL_DAYS: f64 = 1.0;
const SECOND_GOOD_INTERVAL_DAYS: f64 = 6.0;
const FIRST_EASY_INTERVAL_DAYS: f64 = 4.0;
/// Repetition count at which a card graduates from learning to mature.
const MATURE_REPETITIONS: u32 = 3;

/// Scheduling state of one flashcard. Persisted by the caller between
/// reviews; the engine only transforms it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Days until the next review.
    pub interval: f64,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub next_review_at: DateTime<Utc>,
}

impl CardState {
    /// A brand-new card, due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval: 0.0,
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            next_review_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl FromStr for Rating {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGAIN" => Ok(Rating::Again),
            "HARD" => Ok(Rating::Hard),
            "GOOD" => Ok(Rating::Good),
            "EASY" => Ok(Rating::Easy),
            other => Err(EngineError::Validation(format!(
                "invalid rating: {other}"
            ))),
        }
    }
}

/// Coarse card lifecycle label derived from the repetition count, used by
/// review queues to group due cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardMaturity {
    New,
    Learning,
    Mature,
}

pub fn maturity(card: &CardState) -> CardMaturity {
    match card.repetitions {
        0 => CardMaturity::New,
        r if r < MATURE_REPETITIONS => CardMaturity::Learning,
        _ => CardMaturity::Mature,
    }
}

/// Apply one review rating. Pure: the input card is untouched.
pub fn rate(card: &CardState, rating: Rating, now: DateTime<Utc>) -> CardState {
    let (interval, repetitions, ease_factor) = match rating {
        Rating::Again => (
            MIN_INTERVAL_DAYS,
            0,
            (card.ease_factor - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR),
        ),
        Rating::Hard => (
            card.interval * HARD_INTERVAL_MULTIPLIER,
            card.repetitions + 1,
            (card.ease_factor - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR),
        ),
        Rating::Good => {
            let interval = match card.repetitions {
                0 => FIRST_GOOD_INTERVAL_DAYS,
                1 => SECOND_GOOD_INTERVAL_DAYS,
                _ => card.interval * card.ease_factor,
            };
            (interval, card.repetitions + 1, card.ease_factor)
        }
        Rating::Easy => {
            let interval = if card.repetitions == 0 {
                FIRST_EASY_INTERVAL_DAYS
            } else {
                card.interval * card.ease_factor * EASY_INTERVAL_BONUS
            };
            (
                interval,
                card.repetitions + 1,
                card.ease_factor + EASY_EASE_BONUS,
            )
        }
    };

    let interval = interval.max(MIN_INTERVAL_DAYS);
    CardState {
        interval,
        repetitions,
        ease_factor,
        next_review_at: now + Duration::milliseconds((interval * MILLIS_PER_DAY) as i64),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn good_chain_goes_one_six_fifteen() {
        let card = CardState::new(now());

        let card = rate(&card, Rating::Good, now());
        assert_eq!(card.interval, 1.0);
        assert_eq!(card.repetitions, 1);

        let card = rate(&card, Rating::Good, now());
        assert_eq!(card.interval, 6.0);
        assert_eq!(card.repetitions, 2);

        // 6 * 2.5 = 15
        let card = rate(&card, Rating::Good, now());
        assert_eq!(card.interval, 15.0);
        assert_eq!(card.repetitions, 3);
        assert_eq!(card.ease_factor, DEFAULT_EASE_FACTOR);
    }

    #[test]
    fn again_resets_to_floor() {
        let card = CardState {
            interval: 15.0,
            repetitions: 5,
            ease_factor: 2.5,
            next_review_at: now(),
        };
        let card = rate(&card, Rating::Again, now());
        assert_eq!(card.interval, MIN_INTERVAL_DAYS);
        assert_eq!(card.repetitions, 0);
        assert!((card.ease_factor - 2.3).abs() < 1e-9);
        // ~1 minute out
        let delta = card.next_review_at - now();
        assert!(delta.num_seconds() >= 55 && delta.num_seconds() <= 65);
    }

    #[test]
    fn ease_factor_never_drops_below_floor() {
        let mut card = CardState::new(now());
        for _ in 0..20 {
            card = rate(&card, Rating::Again, now());
        }
        assert_eq!(card.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn hard_grows_interval_slowly_and_penalizes_ease() {
        let card = CardState {
            interval: 10.0,
            repetitions: 3,
            ease_factor: 2.5,
            next_review_at: now(),
        };
        let card = rate(&card, Rating::Hard, now());
        assert!((card.interval - 12.0).abs() < 1e-9);
        assert_eq!(card.repetitions, 4);
        assert!((card.ease_factor - 2.35).abs() < 1e-9);
    }

    #[test]
    fn easy_boosts_interval_and_ease() {
        let fresh = rate(&CardState::new(now()), Rating::Easy, now());
        assert_eq!(fresh.interval, 4.0);
        assert_eq!(fresh.repetitions, 1);
        assert!((fresh.ease_factor - 2.65).abs() < 1e-9);

        let card = CardState {
            interval: 10.0,
            repetitions: 2,
            ease_factor: 2.0,
            next_review_at: now(),
        };
        let rated = rate(&card, Rating::Easy, now());
        assert!((rated.interval - 26.0).abs() < 1e-9);
        assert!(rated.ease_factor > card.ease_factor);
    }

    #[test]
    fn next_review_matches_interval() {
        let card = rate(&CardState::new(now()), Rating::Good, now());
        assert_eq!(card.next_review_at, now() + Duration::days(1));
    }

    #[test]
    fn rating_parses_from_wire_tokens() {
        assert_eq!("AGAIN".parse::<Rating>().unwrap(), Rating::Again);
        assert_eq!("EASY".parse::<Rating>().unwrap(), Rating::Easy);
        let err = "SUPERB".parse::<Rating>().unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn maturity_tracks_repetitions() {
        let mut card = CardState::new(now());
        assert_eq!(maturity(&card), CardMaturity::New);
        card = rate(&card, Rating::Good, now());
        assert_eq!(maturity(&card), CardMaturity::Learning);
        card = rate(&card, Rating::Good, now());
        assert_eq!(maturity(&card), CardMaturity::Learning);
        card = rate(&card, Rating::Good, now());
        assert_eq!(maturity(&card), CardMaturity::Mature);
    }
}
