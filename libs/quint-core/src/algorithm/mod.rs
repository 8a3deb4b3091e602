//! Spaced repetition algorithm implementations.

pub mod fsrs;
pub mod fuzz;
pub mod sm2;

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};
use crate::review::{ReviewLog, ReviewOutcome};
use crate::time;
use crate::types::{Algorithm, Card, DeckParameters, MemoryState, Rating};

/// Trait for spaced repetition algorithms.
///
/// Implementations receive a card that has already been validated and must
/// return the complete memory state after answering it with `rating` at `now`.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier recorded in review logs.
    fn algorithm(&self) -> Algorithm;

    /// Calculate the next memory state after a review.
    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> MemoryState;
}

/// Build the algorithm selected by `params`.
pub fn get_algorithm(params: &DeckParameters) -> Result<Box<dyn SpacedRepetitionAlgorithm>> {
    params.validate()?;
    Ok(match params.algorithm {
        Algorithm::Fsrs => Box::new(fsrs::Fsrs::from_parameters(params)?),
        Algorithm::Sm2 => Box::new(sm2::Sm2::from_parameters(params)),
    })
}

/// Schedules reviews for the cards of one deck.
pub struct Scheduler {
    algorithm: Box<dyn SpacedRepetitionAlgorithm>,
}

impl Scheduler {
    /// Validate `params` and select the configured algorithm.
    pub fn new(params: &DeckParameters) -> Result<Self> {
        Ok(Self {
            algorithm: get_algorithm(params)?,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm.algorithm()
    }

    /// Review `card` with a raw rating value (0 = again .. 3 = easy).
    ///
    /// The card is never modified; the scheduled copy is returned alongside
    /// the log entry that records the decision.
    pub fn review(
        &self,
        card: &Card,
        rating: i64,
        response_ms: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        let rating = Rating::from_value(rating)?;
        self.review_rating(card, rating, response_ms, now)
    }

    /// Review `card` with an already parsed rating.
    pub fn review_rating(
        &self,
        card: &Card,
        rating: Rating,
        response_ms: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        card.memory.validate()?;
        if let Some(last_review) = card.memory.last_review {
            if now < last_review {
                return Err(Error::Validation(format!(
                    "review time {now} precedes last review {last_review} of card {}",
                    card.id
                )));
            }
        }

        let memory = self.algorithm.schedule(card, rating, now);
        memory.validate().map_err(|err| {
            Error::Validation(format!(
                "{} produced an invalid state for card {}: {err}",
                self.algorithm(),
                card.id
            ))
        })?;
        let log = ReviewLog::record(card, &memory, rating, response_ms, now, self.algorithm());

        Ok(ReviewOutcome {
            card: Card {
                memory,
                ..card.clone()
            },
            log,
        })
    }
}

/// Whole days since the card was last reviewed (0 on the first review).
pub(crate) fn elapsed_days(memory: &MemoryState, now: DateTime<Utc>) -> i64 {
    memory
        .last_review
        .map(|last| time::days_between(last, now))
        .unwrap_or(0)
}

/// Day-scale interval rules shared by both algorithms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntervalPolicy {
    pub maximum_interval_days: i64,
    pub enable_fuzz: bool,
}

impl IntervalPolicy {
    pub fn from_parameters(params: &DeckParameters) -> Self {
        Self {
            maximum_interval_days: params.maximum_interval_days,
            enable_fuzz: params.enable_fuzz,
        }
    }

    /// Round, optionally fuzz and clamp a raw interval to `[1, maximum]` days.
    pub fn days(&self, raw_days: f64, card_id: i64, now: DateTime<Utc>) -> i64 {
        let max = self.maximum_interval_days.max(1);
        let raw_days = self.clamp_raw(raw_days);

        if self.enable_fuzz {
            fuzz::fuzz_interval(raw_days, max, fuzz::seed(card_id, now))
        } else {
            (raw_days.round() as i64).clamp(1, max)
        }
    }

    /// Whole-day intervals for every rating, indexed by rating value.
    ///
    /// All ratings share one fuzz seed and each interval is raised to at
    /// least the one below it, so a better answer is never due sooner.
    pub fn ordered_days(&self, raw_days: [f64; 4], card_id: i64, now: DateTime<Utc>) -> [i64; 4] {
        let mut days = raw_days.map(|raw| self.days(raw, card_id, now));
        for i in 1..days.len() {
            days[i] = days[i].max(days[i - 1]);
        }
        days
    }

    /// Raw interval clamped to `[1, maximum]` days without rounding or fuzz.
    pub fn clamp_raw(&self, raw_days: f64) -> f64 {
        let max = self.maximum_interval_days.max(1) as f64;
        if raw_days.is_nan() {
            1.0
        } else {
            raw_days.clamp(1.0, max)
        }
    }

    /// Due date `days` days after `now`.
    pub fn due(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        now + Duration::days(days)
    }
}
