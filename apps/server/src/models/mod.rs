//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export shared types from quint-core
pub use quint_core::{
    Algorithm, Card, Deck, DeckParameters, DeckStats, LearningSteps, Rating, ReviewLog,
    ReviewOutcome,
};

// === Deck Types ===

/// Create deck request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    /// Scheduler parameters; defaults to the server's default algorithm.
    #[serde(default)]
    pub parameters: Option<DeckParameters>,
}

/// Partial update of a deck's scheduler parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateParametersRequest {
    pub algorithm: Option<Algorithm>,
    pub weights: Option<Vec<f64>>,
    pub request_retention: Option<f64>,
    pub maximum_interval_days: Option<i64>,
    pub enable_fuzz: Option<bool>,
    pub learning_steps: Option<LearningSteps>,
}

impl UpdateParametersRequest {
    /// Overlay the provided fields on `current`.
    pub fn apply(self, current: DeckParameters) -> DeckParameters {
        DeckParameters {
            algorithm: self.algorithm.unwrap_or(current.algorithm),
            weights: self.weights.unwrap_or(current.weights),
            request_retention: self.request_retention.unwrap_or(current.request_retention),
            maximum_interval_days: self
                .maximum_interval_days
                .unwrap_or(current.maximum_interval_days),
            enable_fuzz: self.enable_fuzz.unwrap_or(current.enable_fuzz),
            learning_steps: self.learning_steps.unwrap_or(current.learning_steps),
        }
    }
}

/// Deck with its current counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckResponse {
    #[serde(flatten)]
    pub deck: Deck,
    pub stats: DeckStats,
}

/// Deck list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<DeckResponse>,
}

/// Reference time for due queries; defaults to now.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Due cards of a deck, earliest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueCardsResponse {
    pub as_of: DateTime<Utc>,
    pub cards: Vec<Card>,
}

// === Card Types ===

/// Card with counters derived from its review log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: Card,
    pub reps: usize,
    pub lapses: usize,
}

/// Review history of a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardHistoryResponse {
    pub card_id: i64,
    pub reps: usize,
    pub lapses: usize,
    pub last_review: Option<DateTime<Utc>>,
    pub reviews: Vec<ReviewLog>,
}

// === Study Types ===

/// Submit review request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub card_id: i64,
    /// 0 = again, 1 = hard, 2 = good, 3 = easy
    pub rating: i64,
    #[serde(default)]
    pub response_ms: Option<u32>,
    /// When the card was answered; defaults to the time the request arrives.
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}
