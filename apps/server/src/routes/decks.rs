//! Deck endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use quint_core::DeckStatsAggregator;

use crate::db::{CardRepository, DeckRepository, SqliteRepository};
use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

fn deck_not_found(id: i64) -> ApiError {
    quint_core::Error::NotFound { entity: "deck", id }.into()
}

fn load_deck(repo: &SqliteRepository, id: i64) -> Result<Deck> {
    repo.get_deck(id)?.ok_or_else(|| deck_not_found(id))
}

fn with_stats(repo: &SqliteRepository, deck: Deck) -> Result<DeckResponse> {
    let cards = repo.get_cards_by_deck(deck.id)?;
    let stats = DeckStatsAggregator::new(&cards).stats(deck.id, Utc::now());
    Ok(DeckResponse { deck, stats })
}

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Result<Json<DeckListResponse>> {
    let repo = state.repository()?;
    let decks = repo
        .get_all_decks()?
        .into_iter()
        .map(|deck| with_stats(&repo, deck))
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(DeckListResponse { decks }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<(StatusCode, Json<DeckResponse>)> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("deck name must not be empty".to_string()));
    }

    let parameters = payload
        .parameters
        .unwrap_or_else(|| DeckParameters::for_algorithm(state.config.default_algorithm));
    parameters.validate()?;

    let repo = state.repository()?;
    let deck = repo.create_deck(name, &parameters, Utc::now())?;
    tracing::info!(deck_id = deck.id, algorithm = %deck.parameters.algorithm, "deck created");

    Ok((StatusCode::CREATED, Json(with_stats(&repo, deck)?)))
}

/// GET /api/decks/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<DeckResponse>> {
    let repo = state.repository()?;
    let deck = load_deck(&repo, id)?;
    Ok(Json(with_stats(&repo, deck)?))
}

/// PUT /api/decks/:id/parameters
///
/// Cards keep their schedule; new parameters apply from the next review.
pub async fn update_parameters(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateParametersRequest>,
) -> Result<Json<DeckResponse>> {
    let repo = state.repository()?;
    let mut deck = load_deck(&repo, id)?;

    let parameters = payload.apply(deck.parameters);
    parameters.validate()?;

    if !repo.update_deck_parameters(id, &parameters)? {
        return Err(deck_not_found(id));
    }
    tracing::info!(deck_id = id, algorithm = %parameters.algorithm, "deck parameters updated");

    deck.parameters = parameters;
    Ok(Json(with_stats(&repo, deck)?))
}

/// GET /api/decks/:id/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<DeckStats>> {
    let repo = state.repository()?;
    let deck = load_deck(&repo, id)?;
    let cards = repo.get_cards_by_deck(deck.id)?;
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    Ok(Json(DeckStatsAggregator::new(&cards).stats(deck.id, as_of)))
}

/// GET /api/decks/:id/due
pub async fn due(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<DueCardsResponse>> {
    let repo = state.repository()?;
    let deck = load_deck(&repo, id)?;
    let cards = repo.get_cards_by_deck(deck.id)?;
    let as_of = query.as_of.unwrap_or_else(Utc::now);

    let mut due: Vec<Card> = DeckStatsAggregator::new(&cards)
        .due_cards(deck.id, as_of)
        .into_iter()
        .cloned()
        .collect();
    if let Some(limit) = query.limit {
        due.truncate(limit);
    }

    Ok(Json(DueCardsResponse { as_of, cards: due }))
}

/// GET /api/decks/:id/new
pub async fn new_cards(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Vec<Card>>> {
    let repo = state.repository()?;
    let deck = load_deck(&repo, id)?;
    let cards = repo.get_cards_by_deck(deck.id)?;
    let fresh = DeckStatsAggregator::new(&cards)
        .new_cards(deck.id, query.limit)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(fresh))
}

/// POST /api/decks/:id/cards
pub async fn create_card(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Card>)> {
    let repo = state.repository()?;
    let deck = load_deck(&repo, id)?;
    let card = repo.create_card(deck.id, Utc::now())?;
    tracing::debug!(deck_id = deck.id, card_id = card.id, "card created");
    Ok((StatusCode::CREATED, Json(card)))
}
