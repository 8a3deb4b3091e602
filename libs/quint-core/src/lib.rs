//! Scheduling core of the Quint flashcard application.
//!
//! Provides:
//! - Card memory model and per-deck scheduler parameters
//! - Spaced repetition algorithm implementations (FSRS, SM-2)
//! - Review log records, history aggregation and replay
//! - Deck statistics over card collections
//!
//! Everything here is pure computation; persistence belongs to the caller.

pub mod algorithm;
pub mod error;
pub mod history;
pub mod review;
pub mod stats;
pub mod time;
pub mod types;

pub use algorithm::{Scheduler, SpacedRepetitionAlgorithm};
pub use error::{Error, Result};
pub use review::{ReviewLog, ReviewOutcome};
pub use stats::{DeckStats, DeckStatsAggregator};
pub use types::{
    Algorithm, Card, CardState, Deck, DeckParameters, LearningSteps, MemoryState, Rating,
};
