//! Aggregates over a card's review history.
//!
//! Counters such as reps and lapses are derived from the log on demand
//! instead of being stored on the card, so they cannot drift from it.

use chrono::{DateTime, Utc};

use crate::algorithm::Scheduler;
use crate::error::{Error, Result};
use crate::review::ReviewLog;
use crate::types::{Algorithm, Card, DeckParameters, Rating};

/// Number of reviews.
pub fn reps(logs: &[ReviewLog]) -> usize {
    logs.len()
}

/// Number of reviews rated Again.
pub fn lapses(logs: &[ReviewLog]) -> usize {
    logs.iter().filter(|log| log.rating == Rating::Again).count()
}

/// Timestamp of the most recent review.
pub fn last_review(logs: &[ReviewLog]) -> Option<DateTime<Utc>> {
    logs.iter().map(|log| log.reviewed_at).max()
}

/// Rebuild a card by replaying its history from the New state.
///
/// Each entry is re-run through the algorithm it was recorded with, using
/// `params` for everything else. Entries are applied in `reviewed_at` order.
pub fn replay(
    card_id: i64,
    deck_id: i64,
    created_at: DateTime<Utc>,
    params: &DeckParameters,
    logs: &[ReviewLog],
) -> Result<Card> {
    let mut ordered: Vec<&ReviewLog> = logs.iter().collect();
    ordered.sort_by_key(|log| log.reviewed_at);

    let fsrs = Scheduler::new(&params.with_algorithm(Algorithm::Fsrs));
    let sm2 = Scheduler::new(&params.with_algorithm(Algorithm::Sm2));

    let mut card = Card::new(card_id, deck_id, created_at);
    for log in ordered {
        if log.card_id != card_id {
            return Err(Error::Validation(format!(
                "review {} belongs to card {}, not {card_id}",
                log.id, log.card_id
            )));
        }

        let scheduler = match log.algorithm {
            Algorithm::Fsrs => fsrs.as_ref(),
            Algorithm::Sm2 => sm2.as_ref(),
        }
        .map_err(Clone::clone)?;

        card = scheduler
            .review_rating(&card, log.rating, log.response_ms, log.reviewed_at)?
            .card;
    }

    Ok(card)
}
