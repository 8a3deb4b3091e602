//! Card endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use quint_core::history;

use crate::db::{CardRepository, ReviewRepository};
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

fn card_not_found(id: i64) -> ApiError {
    quint_core::Error::NotFound { entity: "card", id }.into()
}

/// GET /api/cards/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CardResponse>> {
    let repo = state.repository()?;
    let card = repo.get_card(id)?.ok_or_else(|| card_not_found(id))?;
    let reviews = repo.get_reviews(id)?;

    Ok(Json(CardResponse {
        card,
        reps: history::reps(&reviews),
        lapses: history::lapses(&reviews),
    }))
}

/// DELETE /api/cards/:id
///
/// Removes the card together with its review log.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode> {
    let repo = state.repository()?;
    if !repo.delete_card(id)? {
        return Err(card_not_found(id));
    }
    tracing::info!(card_id = id, "card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/cards/:id/reviews
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CardHistoryResponse>> {
    let repo = state.repository()?;
    if repo.get_card(id)?.is_none() {
        return Err(card_not_found(id));
    }
    let reviews = repo.get_reviews(id)?;

    Ok(Json(CardHistoryResponse {
        card_id: id,
        reps: history::reps(&reviews),
        lapses: history::lapses(&reviews),
        last_review: history::last_review(&reviews),
        reviews,
    }))
}
