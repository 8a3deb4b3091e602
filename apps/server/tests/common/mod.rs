//! Common test utilities for integration tests.
//!
//! Every TestContext owns a fresh in-memory SQLite database, so tests run
//! in isolation without external services.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};

use quint_server::build_router;
use quint_server::config::Config;
use quint_server::db::SqliteRepository;
use quint_server::AppState;

/// Test context containing the application state and a test server.
pub struct TestContext {
    pub state: AppState,
    pub server: TestServer,
}

impl TestContext {
    /// Create a new test context with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let repository =
            SqliteRepository::open_in_memory().expect("Failed to open in-memory database");
        let state = AppState::new(repository, config);
        let server =
            TestServer::new(build_router(state.clone())).expect("Failed to start test server");
        Self { state, server }
    }

    /// Create a deck and return its ID.
    pub async fn create_deck(&self, name: &str, parameters: Option<Value>) -> i64 {
        let mut body = json!({ "name": name });
        if let Some(parameters) = parameters {
            body["parameters"] = parameters;
        }
        let response = self.server.post("/api/decks").json(&body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["id"]
            .as_i64()
            .expect("deck id in response")
    }

    /// Create a card in a deck and return its ID.
    pub async fn create_card(&self, deck_id: i64) -> i64 {
        let response = self
            .server
            .post(&format!("/api/decks/{deck_id}/cards"))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["id"]
            .as_i64()
            .expect("card id in response")
    }

    /// Submit a review and return the response body.
    pub async fn review(&self, card_id: i64, rating: i64) -> Value {
        let response = self
            .server
            .post("/api/study/review")
            .json(&json!({ "card_id": card_id, "rating": rating, "response_ms": 1200 }))
            .await;
        response.assert_status_ok();
        response.json()
    }
}
