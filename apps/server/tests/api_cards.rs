//! Cards API tests.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use common::TestContext;

#[tokio::test]
async fn test_create_card_starts_new() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Latin", None).await;

    let response = ctx.server.post(&format!("/api/decks/{deck_id}/cards")).await;

    response.assert_status(StatusCode::CREATED);
    let card: Value = response.json();
    assert_eq!(card["deck_id"], deck_id);
    assert_eq!(card["state"], "new");
    assert_eq!(card["stability"], 0.0);
    assert_eq!(card["difficulty"], 0.0);
    assert_eq!(card["ease_factor"], 2.5);
    assert_eq!(card["due"], card["created_at"]);
    assert!(card.get("last_review").is_none());
}

#[tokio::test]
async fn test_create_card_in_unknown_deck() {
    let ctx = TestContext::new();
    let response = ctx.server.post("/api/decks/77/cards").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_card() {
    let ctx = TestContext::new();
    let response = ctx.server.get("/api/cards/12").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = ctx.server.get("/api/cards/12/reviews").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_counts_reps_and_lapses() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Law", None).await;
    let card_id = ctx.create_card(deck_id).await;

    ctx.review(card_id, 0).await;
    ctx.review(card_id, 1).await;
    let last = ctx.review(card_id, 2).await;

    let response = ctx
        .server
        .get(&format!("/api/cards/{card_id}/reviews"))
        .await;
    response.assert_status_ok();
    let history: Value = response.json();

    assert_eq!(history["card_id"], card_id);
    assert_eq!(history["reps"], 3);
    assert_eq!(history["lapses"], 1);
    assert_eq!(history["last_review"], last["log"]["reviewed_at"]);

    let ratings: Vec<&str> = history["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|review| review["rating"].as_str().unwrap())
        .collect();
    assert_eq!(ratings, vec!["again", "hard", "good"]);
}

#[tokio::test]
async fn test_delete_card_removes_history() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Botany", None).await;
    let card_id = ctx.create_card(deck_id).await;
    ctx.review(card_id, 2).await;

    let response = ctx.server.delete(&format!("/api/cards/{card_id}")).await;
    response.assert_status(StatusCode::NO_CONTENT);

    ctx.server
        .get(&format!("/api/cards/{card_id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .get(&format!("/api/cards/{card_id}/reviews"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .delete(&format!("/api/cards/{card_id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let stats: Value = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/stats"))
        .await
        .json();
    assert_eq!(stats["total"], 0);
}
