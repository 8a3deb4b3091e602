//! FSRS (Free Spaced Repetition Scheduler) algorithm.
//!
//! Memory is modelled with the DSR model:
//! - Difficulty (D): intrinsic card difficulty, 1-10
//! - Stability (S): days until retrievability decays to 90%
//! - Retrievability (R): probability of recall at review time

use super::{elapsed_days, IntervalPolicy, SpacedRepetitionAlgorithm};
use crate::error::{Error, Result};
use crate::time;
use crate::types::{
    Algorithm, Card, CardState, DeckParameters, LearningSteps, MemoryState, Rating,
    DEFAULT_REQUEST_RETENTION, DEFAULT_WEIGHTS, FSRS_WEIGHT_COUNT, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
use chrono::{DateTime, Utc};

/// Smallest stability a card can be assigned.
pub const MIN_STABILITY: f64 = 0.1;
/// Largest stability a card can be assigned.
pub const MAX_STABILITY: f64 = 36500.0;

const MINUTES_PER_DAY: u32 = 1440;

/// FSRS algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Fsrs {
    pub request_retention: f64,
    /// FSRS-4.5 parameters (17 weights).
    pub w: [f64; FSRS_WEIGHT_COUNT],
    pub learning_steps: LearningSteps,
    policy: IntervalPolicy,
}

impl Default for Fsrs {
    fn default() -> Self {
        Self {
            request_retention: DEFAULT_REQUEST_RETENTION,
            w: DEFAULT_WEIGHTS,
            learning_steps: LearningSteps::default(),
            policy: IntervalPolicy::from_parameters(&DeckParameters::default()),
        }
    }
}

impl SpacedRepetitionAlgorithm for Fsrs {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Fsrs
    }

    fn schedule(&self, card: &Card, rating: Rating, now: DateTime<Utc>) -> MemoryState {
        let memory = &card.memory;
        let elapsed_days = elapsed_days(memory, now);
        let next_state = memory.state.next(rating);

        let (stability, difficulty) = self.memory_after(memory, rating, elapsed_days);

        let (due, scheduled_days) = if next_state.is_learning() {
            let step = self.learning_steps.minutes_for(rating);
            (now + time::minutes(step), i64::from(step / MINUTES_PER_DAY))
        } else {
            let raw_intervals = Rating::ALL.map(|candidate| {
                let (stability, _) = self.memory_after(memory, candidate, elapsed_days);
                self.interval_from_stability(stability)
            });
            let days =
                self.policy.ordered_days(raw_intervals, card.id, now)[rating.to_value() as usize];
            (IntervalPolicy::due(now, days), days)
        };

        MemoryState {
            due,
            stability,
            difficulty,
            elapsed_days,
            scheduled_days,
            state: next_state,
            ease_factor: memory.ease_factor,
            last_review: Some(now),
        }
    }
}

impl Fsrs {
    pub fn from_parameters(params: &DeckParameters) -> Result<Self> {
        let w: [f64; FSRS_WEIGHT_COUNT] = params.weights.as_slice().try_into().map_err(|_| {
            Error::Validation(format!(
                "fsrs requires {FSRS_WEIGHT_COUNT} weights, got {}",
                params.weights.len()
            ))
        })?;

        Ok(Self {
            request_retention: params.request_retention,
            w,
            learning_steps: params.learning_steps,
            policy: IntervalPolicy::from_parameters(params),
        })
    }

    /// Initial stability for the first rating.
    /// S0(G) = w[G]
    pub fn initial_stability(&self, rating: Rating) -> f64 {
        self.w[rating.to_value() as usize]
    }

    /// Initial difficulty for the first rating.
    /// D0(G) = w[4] - e^(w[5] * (G - 1)) + 1
    pub fn initial_difficulty(&self, rating: Rating) -> f64 {
        let g = f64::from(rating.to_value());
        let d0 = self.w[4] - (self.w[5] * (g - 1.0)).exp() + 1.0;
        d0.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    /// Difficulty after a review, damped towards 10 and reverted towards D0(Easy).
    /// D' = D + dD * (10 - D) / 9 where dD = -w[6] * (grade - 3)
    /// D'' = w[7] * D0(Easy) + (1 - w[7]) * D'
    pub fn next_difficulty(&self, difficulty: f64, rating: Rating) -> f64 {
        let delta = -self.w[6] * (f64::from(rating.grade()) - 3.0);
        let damped = difficulty + delta * (MAX_DIFFICULTY - difficulty) / 9.0;
        let reverted = self.w[7] * self.initial_difficulty(Rating::Easy) + (1.0 - self.w[7]) * damped;
        reverted.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    /// Probability of recall after `elapsed_days`.
    /// R = e^(ln(0.9) * t / S)
    pub fn retrievability(&self, elapsed_days: f64, stability: f64) -> f64 {
        if stability <= 0.0 {
            return 0.0;
        }
        (0.9f64.ln() * elapsed_days / stability).exp()
    }

    /// Stability after a successful recall.
    /// S' = S * (e^(w[8]) * (11 - D) * S^(-w[9]) * (e^(w[10]*(1-R)) - 1) * modifier + 1)
    pub fn next_recall_stability(
        &self,
        stability: f64,
        difficulty: f64,
        retrievability: f64,
        rating: Rating,
    ) -> f64 {
        let modifier = match rating {
            Rating::Hard => self.w[15],
            Rating::Easy => self.w[16],
            Rating::Again | Rating::Good => 1.0,
        };

        let growth = self.w[8].exp()
            * (11.0 - difficulty)
            * stability.powf(-self.w[9])
            * ((self.w[10] * (1.0 - retrievability)).exp() - 1.0)
            * modifier;

        (stability * (growth + 1.0)).clamp(MIN_STABILITY, MAX_STABILITY)
    }

    /// Stability after a lapse.
    /// S' = w[11] * D^(-w[12]) * ((S+1)^w[13] - 1) * e^(w[14]*(1-R))
    pub fn next_forget_stability(&self, stability: f64, difficulty: f64, retrievability: f64) -> f64 {
        let new_s = self.w[11]
            * difficulty.max(MIN_DIFFICULTY).powf(-self.w[12])
            * ((stability + 1.0).powf(self.w[13]) - 1.0)
            * (self.w[14] * (1.0 - retrievability)).exp();

        // Never exceed previous stability on lapse
        new_s.min(stability).max(MIN_STABILITY)
    }

    /// Interval (days) at which retrievability falls to the requested retention.
    /// I = S / ln(0.9) * ln(request_retention)
    pub fn interval_from_stability(&self, stability: f64) -> f64 {
        stability / 0.9f64.ln() * self.request_retention.ln()
    }

    /// Stability and difficulty after answering `memory` with `rating`.
    fn memory_after(&self, memory: &MemoryState, rating: Rating, elapsed_days: i64) -> (f64, f64) {
        if memory.state == CardState::New || memory.is_uninitialized() {
            (self.initial_stability(rating), self.initial_difficulty(rating))
        } else {
            self.next_memory(memory, rating, elapsed_days)
        }
    }

    fn next_memory(&self, memory: &MemoryState, rating: Rating, elapsed_days: i64) -> (f64, f64) {
        let r = self.retrievability(elapsed_days as f64, memory.stability);
        let difficulty = self.next_difficulty(memory.difficulty, rating);

        let stability = match (memory.state, rating) {
            // Failing a learning step restarts from the first-answer stability
            (CardState::Learning, Rating::Again) => memory.stability.min(self.w[0]),
            (_, Rating::Again) => self.next_forget_stability(memory.stability, memory.difficulty, r),
            _ => self.next_recall_stability(memory.stability, memory.difficulty, r, rating),
        };

        (stability, difficulty)
    }
}
