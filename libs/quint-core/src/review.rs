//! Review log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Algorithm, Card, CardState, MemoryState, Rating};

/// Immutable snapshot of one scheduling decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub id: Uuid,
    pub card_id: i64,
    pub reviewed_at: DateTime<Utc>,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_ms: Option<u32>,
    pub state_before: CardState,
    pub state_after: CardState,
    pub scheduled_days_before: i64,
    pub scheduled_days_after: i64,
    pub elapsed_days: i64,
    pub stability_before: f64,
    pub stability_after: f64,
    pub difficulty_before: f64,
    pub difficulty_after: f64,
    pub algorithm: Algorithm,
}

impl ReviewLog {
    /// Record the transition of `before` to `after`.
    pub fn record(
        before: &Card,
        after: &MemoryState,
        rating: Rating,
        response_ms: Option<u32>,
        reviewed_at: DateTime<Utc>,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id: before.id,
            reviewed_at,
            rating,
            response_ms,
            state_before: before.memory.state,
            state_after: after.state,
            scheduled_days_before: before.memory.scheduled_days,
            scheduled_days_after: after.scheduled_days,
            elapsed_days: after.elapsed_days,
            stability_before: before.memory.stability,
            stability_after: after.stability,
            difficulty_before: before.memory.difficulty,
            difficulty_after: after.difficulty,
            algorithm,
        }
    }

    /// Whether this review forgot a card that had been learned.
    pub fn is_lapse(&self) -> bool {
        self.rating == Rating::Again
            && matches!(self.state_before, CardState::Review | CardState::Relearning)
    }
}

/// Result of a review: the rescheduled card and its log entry.
///
/// Both must be persisted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub card: Card,
    pub log: ReviewLog,
}
