//! Study endpoints

use axum::{extract::State, Json};
use chrono::Utc;
use quint_core::Scheduler;

use crate::db::{CardRepository, DeckRepository, ReviewRepository};
use crate::error::Result;
use crate::models::*;
use crate::AppState;

/// POST /api/study/review
pub async fn review(
    State(state): State<AppState>,
    Json(payload): Json<SubmitReviewRequest>,
) -> Result<Json<ReviewOutcome>> {
    let repo = state.repository()?;

    let card = repo
        .get_card(payload.card_id)?
        .ok_or(quint_core::Error::NotFound {
            entity: "card",
            id: payload.card_id,
        })?;
    let deck = repo
        .get_deck(card.deck_id)?
        .ok_or(quint_core::Error::NotFound {
            entity: "deck",
            id: card.deck_id,
        })?;

    let scheduler = Scheduler::new(&deck.parameters)?;
    let reviewed_at = payload.reviewed_at.unwrap_or_else(Utc::now);
    let outcome = scheduler.review(&card, payload.rating, payload.response_ms, reviewed_at)?;
    repo.commit_review(&outcome)?;

    tracing::info!(
        card_id = card.id,
        deck_id = deck.id,
        algorithm = %outcome.log.algorithm,
        rating = ?outcome.log.rating,
        state = ?outcome.card.state(),
        scheduled_days = outcome.card.memory.scheduled_days,
        "review recorded"
    );

    Ok(Json(outcome))
}
