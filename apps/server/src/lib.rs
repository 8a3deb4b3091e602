pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::SqliteRepository;

pub use crate::state::AppState;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.database_path.display(), "Opening database...");
    let repository = SqliteRepository::open(&config.database_path)?;

    let addr = config.addr();
    let app = build_router(AppState::new(repository, config))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Deck routes
        .route("/api/decks", get(routes::decks::list).post(routes::decks::create))
        .route("/api/decks/:id", get(routes::decks::get))
        .route("/api/decks/:id/parameters", put(routes::decks::update_parameters))
        .route("/api/decks/:id/stats", get(routes::decks::stats))
        .route("/api/decks/:id/due", get(routes::decks::due))
        .route("/api/decks/:id/new", get(routes::decks::new_cards))
        .route("/api/decks/:id/cards", post(routes::decks::create_card))
        // Card routes
        .route("/api/cards/:id", get(routes::cards::get).delete(routes::cards::delete))
        .route("/api/cards/:id/reviews", get(routes::cards::reviews))
        // Study routes
        .route("/api/study/review", post(routes::study::review))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
