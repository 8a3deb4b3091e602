//! Core types for the scheduling model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of FSRS weights a deck must carry.
pub const FSRS_WEIGHT_COUNT: usize = 17;

/// FSRS-4.5 default weights.
pub const DEFAULT_WEIGHTS: [f64; FSRS_WEIGHT_COUNT] = [
    0.4, 0.6, 2.4, 5.8, // w[0-3]: initial stability for Again, Hard, Good, Easy
    4.93, // w[4]: initial difficulty base
    0.94, // w[5]: initial difficulty modifier
    0.86, // w[6]: difficulty delta
    0.01, // w[7]: mean reversion weight
    1.49, // w[8]: stability exp base
    0.14, // w[9]: stability decay
    0.94, // w[10]: retrievability effect
    2.18, // w[11]: forget stability base
    0.05, // w[12]: difficulty on forget
    0.34, // w[13]: stability on forget
    1.26, // w[14]: retrievability on forget
    0.29, // w[15]: hard penalty
    2.61, // w[16]: easy bonus
];

/// Inclusive range each FSRS weight must fall in.
pub const FSRS_WEIGHT_BOUNDS: [(f64, f64); FSRS_WEIGHT_COUNT] = [
    (0.01, 100.0),
    (0.01, 100.0),
    (0.01, 100.0),
    (0.01, 100.0),
    (1.0, 10.0),
    (0.001, 4.0),
    (0.001, 4.0),
    (0.001, 0.75),
    (0.0, 4.5),
    (0.0, 0.8),
    (0.001, 3.5),
    (0.001, 5.0),
    (0.001, 0.25),
    (0.001, 0.9),
    (0.0, 4.0),
    (0.0, 1.0),
    (1.0, 6.0),
];

pub const DEFAULT_REQUEST_RETENTION: f64 = 0.9;
pub const DEFAULT_MAXIMUM_INTERVAL_DAYS: i64 = 36500;
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Card lifecycle stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl CardState {
    /// Stored integer value (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Learning => 1,
            Self::Review => 2,
            Self::Relearning => 3,
        }
    }

    pub fn from_value(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::Learning),
            2 => Ok(Self::Review),
            3 => Ok(Self::Relearning),
            other => Err(Error::validation(format!("unknown card state {other}"))),
        }
    }

    /// State reached after answering a card in this state with `rating`.
    pub fn next(self, rating: Rating) -> Self {
        use CardState::*;
        use Rating::*;

        match (self, rating) {
            (New, Easy) => Review,
            (New, _) => Learning,
            (Learning, Again | Hard) => Learning,
            (Learning, Good | Easy) => Review,
            (Review, Again) => Relearning,
            (Review, _) => Review,
            (Relearning, Again | Hard) => Relearning,
            (Relearning, Good | Easy) => Review,
        }
    }

    /// Whether the card is in a sub-day learning step.
    pub fn is_learning(self) -> bool {
        matches!(self, Self::Learning | Self::Relearning)
    }
}

/// Answer button pressed for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Stored numeric value (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 2,
            Self::Easy => 3,
        }
    }

    /// Parse a raw rating, rejecting anything outside 0-3.
    pub fn from_value(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Again),
            1 => Ok(Self::Hard),
            2 => Ok(Self::Good),
            3 => Ok(Self::Easy),
            other => Err(Error::InvalidRating(other)),
        }
    }

    /// FSRS grade (1-4).
    pub fn grade(self) -> u8 {
        self.to_value() + 1
    }
}

/// Scheduling algorithm selected for a deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Fsrs,
    Sm2,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fsrs => "fsrs",
            Self::Sm2 => "sm2",
        }
    }

    /// Weight count the algorithm requires, if it reads weights at all.
    pub fn expected_weights(&self) -> Option<usize> {
        match self {
            Self::Fsrs => Some(FSRS_WEIGHT_COUNT),
            Self::Sm2 => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fsrs" => Ok(Self::Fsrs),
            "sm2" => Ok(Self::Sm2),
            other => Err(Error::validation(format!("unknown algorithm '{other}'"))),
        }
    }
}

/// Memory model and scheduling metadata of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: i64,
    pub scheduled_days: i64,
    pub state: CardState,
    /// SM-2 ease factor.
    pub ease_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Fresh state for a card that has never been reviewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            due: now,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            state: CardState::New,
            ease_factor: DEFAULT_EASE_FACTOR,
            last_review: None,
        }
    }

    /// True until FSRS has assigned an initial stability and difficulty.
    pub fn is_uninitialized(&self) -> bool {
        self.stability == 0.0
    }

    pub fn validate(&self) -> Result<()> {
        if !self.stability.is_finite() || self.stability < 0.0 {
            return Err(Error::validation(format!(
                "stability must be a non-negative number, got {}",
                self.stability
            )));
        }
        // Zero difficulty marks a card FSRS has not scheduled yet
        let unscheduled = self.state == CardState::New || self.is_uninitialized();
        let difficulty_in_bounds = (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty);
        if !(difficulty_in_bounds || (unscheduled && self.difficulty == 0.0)) {
            return Err(Error::validation(format!(
                "difficulty must be within [{MIN_DIFFICULTY}, {MAX_DIFFICULTY}], got {} for a {:?} card with stability {}",
                self.difficulty, self.state, self.stability
            )));
        }
        if self.elapsed_days < 0 || self.scheduled_days < 0 {
            return Err(Error::validation("elapsed and scheduled days must not be negative"));
        }
        if !self.ease_factor.is_finite() || self.ease_factor <= 0.0 {
            return Err(Error::validation(format!(
                "ease factor must be positive, got {}",
                self.ease_factor
            )));
        }
        Ok(())
    }
}

/// A learnable item owned by a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub deck_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub memory: MemoryState,
}

impl Card {
    pub fn new(id: i64, deck_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            deck_id,
            created_at: now,
            memory: MemoryState::new(now),
        }
    }

    pub fn state(&self) -> CardState {
        self.memory.state
    }

    pub fn due(&self) -> DateTime<Utc> {
        self.memory.due
    }
}

/// Sub-day steps (in minutes) used while a card is Learning or Relearning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningSteps {
    pub again_minutes: u32,
    pub hard_minutes: u32,
    pub good_minutes: u32,
}

impl Default for LearningSteps {
    fn default() -> Self {
        Self {
            again_minutes: 10,
            hard_minutes: 60,
            good_minutes: 1440,
        }
    }
}

impl LearningSteps {
    /// Step for a rating that keeps the card in a learning state.
    pub fn minutes_for(&self, rating: Rating) -> u32 {
        match rating {
            Rating::Again => self.again_minutes,
            Rating::Hard => self.hard_minutes,
            Rating::Good | Rating::Easy => self.good_minutes,
        }
    }
}

/// Per-deck scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckParameters {
    pub algorithm: Algorithm,
    pub weights: Vec<f64>,
    pub request_retention: f64,
    pub maximum_interval_days: i64,
    pub enable_fuzz: bool,
    pub learning_steps: LearningSteps,
}

impl Default for DeckParameters {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            weights: DEFAULT_WEIGHTS.to_vec(),
            request_retention: DEFAULT_REQUEST_RETENTION,
            maximum_interval_days: DEFAULT_MAXIMUM_INTERVAL_DAYS,
            enable_fuzz: true,
            learning_steps: LearningSteps::default(),
        }
    }
}

impl DeckParameters {
    /// Default parameters with the given algorithm selected.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Same parameters with another algorithm selected.
    pub fn with_algorithm(&self, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.request_retention > 0.0 && self.request_retention < 1.0) {
            return Err(Error::validation(format!(
                "request retention must be within (0, 1), got {}",
                self.request_retention
            )));
        }
        if let Some(expected) = self.algorithm.expected_weights() {
            if self.weights.len() != expected {
                return Err(Error::validation(format!(
                    "{} requires {expected} weights, got {}",
                    self.algorithm,
                    self.weights.len()
                )));
            }
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::validation("weights must be finite numbers"));
        }
        if self.algorithm == Algorithm::Fsrs {
            let bounds = self.weights.iter().zip(&FSRS_WEIGHT_BOUNDS);
            for (i, (&w, &(low, high))) in bounds.enumerate() {
                if !(low..=high).contains(&w) {
                    return Err(Error::validation(format!(
                        "weight w[{i}] must be within [{low}, {high}], got {w}"
                    )));
                }
            }
            if self.weights[..4].windows(2).any(|pair| pair[0] > pair[1]) {
                return Err(Error::validation(
                    "initial stabilities w[0..4] must not decrease from again to easy",
                ));
            }
        }
        if self.maximum_interval_days <= 0 {
            return Err(Error::validation(format!(
                "maximum interval must be positive, got {}",
                self.maximum_interval_days
            )));
        }
        let steps = self.learning_steps;
        if steps.again_minutes == 0 || steps.hard_minutes == 0 || steps.good_minutes == 0 {
            return Err(Error::validation("learning steps must be at least one minute"));
        }
        Ok(())
    }
}

/// A named collection of cards sharing scheduler parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub parameters: DeckParameters,
}
