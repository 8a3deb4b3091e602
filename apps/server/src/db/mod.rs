//! SQLite persistence for decks, cards and review logs.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{CardRepository, DeckRepository, ReviewRepository, SqliteRepository};
