//! Deck-level counts over a card collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::end_of_day;
use crate::types::{Card, CardState};

/// New/due/total counts for one deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    pub new: usize,
    pub due: usize,
    pub total: usize,
}

/// Read-only queries over the cards of a collection.
#[derive(Debug, Clone, Copy)]
pub struct DeckStatsAggregator<'a> {
    cards: &'a [Card],
}

impl<'a> DeckStatsAggregator<'a> {
    pub fn new(cards: &'a [Card]) -> Self {
        Self { cards }
    }

    fn deck(&self, deck_id: i64) -> impl Iterator<Item = &'a Card> + '_ {
        self.cards.iter().filter(move |card| card.deck_id == deck_id)
    }

    /// Cards already seen that are due by the end of `as_of`'s day.
    pub fn due_count(&self, deck_id: i64, as_of: DateTime<Utc>) -> usize {
        let cutoff = end_of_day(as_of);
        self.deck(deck_id)
            .filter(|card| is_due(card, cutoff))
            .count()
    }

    pub fn new_count(&self, deck_id: i64) -> usize {
        self.deck(deck_id)
            .filter(|card| card.state() == CardState::New)
            .count()
    }

    pub fn total_count(&self, deck_id: i64) -> usize {
        self.deck(deck_id).count()
    }

    pub fn stats(&self, deck_id: i64, as_of: DateTime<Utc>) -> DeckStats {
        DeckStats {
            new: self.new_count(deck_id),
            due: self.due_count(deck_id, as_of),
            total: self.total_count(deck_id),
        }
    }

    /// Due cards, earliest due first.
    pub fn due_cards(&self, deck_id: i64, as_of: DateTime<Utc>) -> Vec<&'a Card> {
        let cutoff = end_of_day(as_of);
        let mut cards: Vec<&Card> = self.deck(deck_id).filter(|card| is_due(card, cutoff)).collect();
        cards.sort_by_key(|card| (card.due(), card.id));
        cards
    }

    /// New cards in creation order, optionally limited.
    pub fn new_cards(&self, deck_id: i64, limit: Option<usize>) -> Vec<&'a Card> {
        let mut cards: Vec<&Card> = self
            .deck(deck_id)
            .filter(|card| card.state() == CardState::New)
            .collect();
        cards.sort_by_key(|card| (card.created_at, card.id));
        if let Some(limit) = limit {
            cards.truncate(limit);
        }
        cards
    }
}

fn is_due(card: &Card, cutoff: DateTime<Utc>) -> bool {
    card.state() != CardState::New && card.due() <= cutoff
}
