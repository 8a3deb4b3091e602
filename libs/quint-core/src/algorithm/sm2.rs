//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with configurable parameters. Kept alongside FSRS so
//! decks can be compared side by side and switched without losing history.

use super::{elapsed_days, IntervalPolicy, SpacedRepetitionAlgorithm};
use crate::types::{
    Algorithm, Card, CardState, DeckParameters, MemoryState, Rating, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};
use chrono::{DateTime, Utc};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub minimum_ease: f64,
    pub easy_bonus: f64,
    pub hard_multiplier: f64,
    pub graduating_interval: f64,
    pub easy_interval: f64,
    policy: IntervalPolicy,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self::from_parameters(&DeckParameters::for_algorithm(Algorithm::Sm2))
    }
}

impl SpacedRepetitionAlgorithm for Sm2 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Sm2
    }

    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> MemoryState {
        let memory = &card.memory;
        let ease_factor = self.next_ease(memory.ease_factor, rating);

        let raw_intervals = Rating::ALL.map(|candidate| self.raw_interval(memory, candidate));
        let scheduled_days =
            self.policy.ordered_days(raw_intervals, card.id, now)[rating.to_value() as usize];

        MemoryState {
            due: IntervalPolicy::due(now, scheduled_days),
            stability: self.policy.clamp_raw(raw_intervals[rating.to_value() as usize]),
            difficulty: self.ease_to_difficulty(ease_factor),
            elapsed_days: elapsed_days(memory, now),
            scheduled_days,
            state: memory.state.next(rating),
            ease_factor,
            last_review: Some(now),
        }
    }
}

impl Sm2 {
    pub fn from_parameters(params: &DeckParameters) -> Self {
        Self {
            minimum_ease: 1.3,
            easy_bonus: 1.3,
            hard_multiplier: 1.2,
            graduating_interval: 1.0,
            easy_interval: 4.0,
            policy: IntervalPolicy::from_parameters(params),
        }
    }

    /// Ease factor after answering with `rating`.
    pub fn next_ease(&self, ease_factor: f64, rating: Rating) -> f64 {
        let adjustment = match rating {
            Rating::Again => -0.2,
            Rating::Hard => -0.15,
            Rating::Good => 0.0,
            Rating::Easy => 0.15,
        };
        (ease_factor + adjustment).max(self.minimum_ease)
    }

    /// Unfuzzed interval in days after answering `memory` with `rating`.
    fn raw_interval(&self, memory: &MemoryState, rating: Rating) -> f64 {
        if memory.state == CardState::New {
            self.first_interval(rating)
        } else {
            let ease_factor = self.next_ease(memory.ease_factor, rating);
            // Learning steps may leave a sub-day interval behind
            self.next_interval(memory.scheduled_days.max(1) as f64, ease_factor, rating)
        }
    }

    /// Interval for a card that has no previous interval yet.
    fn first_interval(&self, rating: Rating) -> f64 {
        match rating {
            Rating::Easy => self.easy_interval,
            Rating::Again | Rating::Hard | Rating::Good => self.graduating_interval,
        }
    }

    /// Interval after a review given the previous interval and the updated ease.
    fn next_interval(&self, previous: f64, ease_factor: f64, rating: Rating) -> f64 {
        match rating {
            // Lapse: start over from one day
            Rating::Again => 1.0,
            Rating::Hard => previous * self.hard_multiplier,
            Rating::Good => previous * ease_factor,
            Rating::Easy => previous * ease_factor * self.easy_bonus,
        }
    }

    /// Express the ease factor on the 1-10 difficulty scale (minimum ease = 10).
    ///
    /// Lets review logs compare SM-2 and FSRS decisions and gives FSRS a
    /// starting point if the deck later switches algorithms.
    pub fn ease_to_difficulty(&self, ease_factor: f64) -> f64 {
        (MAX_DIFFICULTY - (ease_factor - self.minimum_ease) * 4.0).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }
}
