//! Decks API tests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::TestContext;
use quint_core::Algorithm;
use quint_server::config::Config;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_list_decks_empty() {
    let ctx = TestContext::new();
    let response = ctx.server.get("/api/decks").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["decks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_deck_uses_defaults() {
    let ctx = TestContext::new();
    let response = ctx
        .server
        .post("/api/decks")
        .json(&json!({ "name": "  Spanish verbs " }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["name"], "Spanish verbs");
    assert_eq!(body["parameters"]["algorithm"], "fsrs");
    assert_eq!(body["parameters"]["request_retention"], 0.9);
    assert_eq!(body["parameters"]["maximum_interval_days"], 36500);
    assert_eq!(body["parameters"]["enable_fuzz"], true);
    assert_eq!(body["parameters"]["weights"].as_array().unwrap().len(), 17);
    assert_eq!(body["stats"], json!({ "new": 0, "due": 0, "total": 0 }));
}

#[tokio::test]
async fn test_default_algorithm_comes_from_config() {
    let ctx = TestContext::with_config(Config {
        default_algorithm: Algorithm::Sm2,
        ..Config::default()
    });
    let deck_id = ctx.create_deck("Capitals", None).await;

    let body: Value = ctx.server.get(&format!("/api/decks/{deck_id}")).await.json();
    assert_eq!(body["parameters"]["algorithm"], "sm2");
}

#[tokio::test]
async fn test_create_deck_rejects_empty_name() {
    let ctx = TestContext::new();
    let response = ctx
        .server
        .post("/api/decks")
        .json(&json!({ "name": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_create_deck_rejects_invalid_parameters() {
    let ctx = TestContext::new();
    for parameters in [
        json!({ "request_retention": 1.5 }),
        json!({ "maximum_interval_days": 0 }),
        json!({ "weights": [0.4, 0.6, 2.4] }),
    ] {
        let response = ctx
            .server
            .post("/api/decks")
            .json(&json!({ "name": "Broken", "parameters": parameters }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    let body: Value = ctx.server.get("/api/decks").await.json();
    assert_eq!(body["decks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_unknown_deck_returns_not_found() {
    let ctx = TestContext::new();
    let response = ctx.server.get("/api/decks/404").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_update_parameters_is_partial() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Chemistry", None).await;

    let response = ctx
        .server
        .put(&format!("/api/decks/{deck_id}/parameters"))
        .json(&json!({ "request_retention": 0.85, "enable_fuzz": false }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["parameters"]["request_retention"], 0.85);
    assert_eq!(body["parameters"]["enable_fuzz"], false);
    assert_eq!(body["parameters"]["algorithm"], "fsrs");
    assert_eq!(body["parameters"]["maximum_interval_days"], 36500);

    let stored: Value = ctx.server.get(&format!("/api/decks/{deck_id}")).await.json();
    assert_eq!(stored["parameters"], body["parameters"]);
}

#[tokio::test]
async fn test_invalid_parameter_update_changes_nothing() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("History", None).await;

    let response = ctx
        .server
        .put(&format!("/api/decks/{deck_id}/parameters"))
        .json(&json!({ "request_retention": 0.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let stored: Value = ctx.server.get(&format!("/api/decks/{deck_id}")).await.json();
    assert_eq!(stored["parameters"]["request_retention"], 0.9);
}

#[tokio::test]
async fn test_switching_to_sm2_ignores_weights() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Music", None).await;

    let response = ctx
        .server
        .put(&format!("/api/decks/{deck_id}/parameters"))
        .json(&json!({ "algorithm": "sm2", "weights": [] }))
        .await;
    response.assert_status_ok();

    // Back to FSRS without weights is rejected
    let response = ctx
        .server
        .put(&format!("/api/decks/{deck_id}/parameters"))
        .json(&json!({ "algorithm": "fsrs" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deck_stats_track_new_and_due_cards() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Biology", None).await;
    let other_deck = ctx.create_deck("Physics", None).await;

    let first = ctx.create_card(deck_id).await;
    let second = ctx.create_card(deck_id).await;
    ctx.create_card(deck_id).await;
    ctx.create_card(other_deck).await;

    ctx.review(first, 0).await;
    ctx.review(second, 3).await;

    let soon = (Utc::now() + Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let response = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/stats"))
        .add_query_param("as_of", soon)
        .await;
    response.assert_status_ok();
    let stats: Value = response.json();
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["new"], 1);
    // Again keeps the card due within minutes; Easy pushes it out by days
    assert_eq!(stats["due"], 1);

    let far = (Utc::now() + Duration::days(60)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let later: Value = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/stats"))
        .add_query_param("as_of", far)
        .await
        .json();
    assert_eq!(later["due"], 2);

    let listed: Value = ctx.server.get("/api/decks").await.json();
    let decks = listed["decks"].as_array().unwrap();
    assert_eq!(decks.len(), 2);
    assert_eq!(decks[0]["stats"]["total"], 3);
    assert_eq!(decks[1]["stats"], json!({ "new": 1, "due": 0, "total": 1 }));
}

#[tokio::test]
async fn test_due_cards_ordered_by_due_date() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Geography", None).await;

    let slow = ctx.create_card(deck_id).await;
    let fast = ctx.create_card(deck_id).await;
    let fresh = ctx.create_card(deck_id).await;

    // Hard: one hour; Again: ten minutes
    ctx.review(slow, 1).await;
    ctx.review(fast, 0).await;

    let far = (Utc::now() + Duration::days(2)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let response = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/due"))
        .add_query_param("as_of", &far)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let ids: Vec<i64> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![fast, slow]);
    assert!(!ids.contains(&fresh));

    let limited: Value = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/due"))
        .add_query_param("as_of", far)
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(limited["cards"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_new_cards_in_creation_order() {
    let ctx = TestContext::new();
    let deck_id = ctx.create_deck("Art", None).await;

    let first = ctx.create_card(deck_id).await;
    let second = ctx.create_card(deck_id).await;
    let third = ctx.create_card(deck_id).await;
    ctx.review(second, 2).await;

    let body: Value = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/new"))
        .await
        .json();
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, third]);

    let limited: Value = ctx
        .server
        .get(&format!("/api/decks/{deck_id}/new"))
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(limited.as_array().unwrap().len(), 1);
}
