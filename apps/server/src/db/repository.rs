//! Repository pattern for database access.

use crate::db::date_utils::{optional_timestamp_column, timestamp_column, to_db_timestamp};
use crate::db::error::DbError;
use chrono::{DateTime, Utc};
use quint_core::{
    Algorithm, Card, CardState, Deck, DeckParameters, LearningSteps, MemoryState, Rating,
    ReviewLog, ReviewOutcome,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

const DECK_COLUMNS: &str = "id, name, created_at, algorithm, weights, request_retention, \
     maximum_interval_days, enable_fuzz, again_step_minutes, hard_step_minutes, good_step_minutes";

const CARD_COLUMNS: &str = "id, deck_id, created_at, due, stability, difficulty, elapsed_days, \
     scheduled_days, state, ease_factor, last_review";

const REVIEW_COLUMNS: &str = "id, card_id, reviewed_at, rating, response_ms, state_before, \
     state_after, scheduled_days_before, scheduled_days_after, elapsed_days, stability_before, \
     stability_after, difficulty_before, difficulty_after, algorithm";

/// Repository for deck operations.
pub trait DeckRepository {
    fn create_deck(
        &self,
        name: &str,
        parameters: &DeckParameters,
        now: DateTime<Utc>,
    ) -> Result<Deck>;
    fn get_deck(&self, id: i64) -> Result<Option<Deck>>;
    fn get_all_decks(&self) -> Result<Vec<Deck>>;
    /// Replace a deck's parameters. Returns false if the deck does not exist.
    fn update_deck_parameters(&self, id: i64, parameters: &DeckParameters) -> Result<bool>;
}

/// Repository for card operations.
pub trait CardRepository {
    fn create_card(&self, deck_id: i64, now: DateTime<Utc>) -> Result<Card>;
    fn get_card(&self, id: i64) -> Result<Option<Card>>;
    fn get_cards_by_deck(&self, deck_id: i64) -> Result<Vec<Card>>;
    /// Delete a card and its review log. Returns false if the card does not exist.
    fn delete_card(&self, id: i64) -> Result<bool>;
}

/// Repository for review log operations.
pub trait ReviewRepository {
    /// Reviews of a card, oldest first.
    fn get_reviews(&self, card_id: i64) -> Result<Vec<ReviewLog>>;
    /// Persist the rescheduled card and its log entry in one transaction.
    fn commit_review(&self, outcome: &ReviewOutcome) -> Result<()>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::PRAGMAS)?;
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

impl DeckRepository for SqliteRepository {
    fn create_deck(
        &self,
        name: &str,
        parameters: &DeckParameters,
        now: DateTime<Utc>,
    ) -> Result<Deck> {
        let weights = serde_json::to_string(&parameters.weights)?;
        let steps = parameters.learning_steps;
        self.conn.execute(
            "INSERT INTO decks (name, created_at, algorithm, weights, request_retention, \
             maximum_interval_days, enable_fuzz, again_step_minutes, hard_step_minutes, good_step_minutes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                name,
                to_db_timestamp(now),
                parameters.algorithm.as_str(),
                weights,
                parameters.request_retention,
                parameters.maximum_interval_days,
                parameters.enable_fuzz,
                steps.again_minutes,
                steps.hard_minutes,
                steps.good_minutes,
            ],
        )?;

        Ok(Deck {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
            parameters: parameters.clone(),
        })
    }

    fn get_deck(&self, id: i64) -> Result<Option<Deck>> {
        self.conn
            .query_row(
                &format!("SELECT {DECK_COLUMNS} FROM decks WHERE id = ?1"),
                params![id],
                deck_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_all_decks(&self) -> Result<Vec<Deck>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {DECK_COLUMNS} FROM decks ORDER BY name, id"))?;
        let decks = stmt
            .query_map([], deck_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decks)
    }

    fn update_deck_parameters(&self, id: i64, parameters: &DeckParameters) -> Result<bool> {
        let weights = serde_json::to_string(&parameters.weights)?;
        let steps = parameters.learning_steps;
        let updated = self.conn.execute(
            "UPDATE decks SET algorithm = ?1, weights = ?2, request_retention = ?3, \
             maximum_interval_days = ?4, enable_fuzz = ?5, again_step_minutes = ?6, \
             hard_step_minutes = ?7, good_step_minutes = ?8 WHERE id = ?9",
            params![
                parameters.algorithm.as_str(),
                weights,
                parameters.request_retention,
                parameters.maximum_interval_days,
                parameters.enable_fuzz,
                steps.again_minutes,
                steps.hard_minutes,
                steps.good_minutes,
                id,
            ],
        )?;
        Ok(updated > 0)
    }
}

impl CardRepository for SqliteRepository {
    fn create_card(&self, deck_id: i64, now: DateTime<Utc>) -> Result<Card> {
        let memory = MemoryState::new(now);
        self.conn.execute(
            "INSERT INTO cards (deck_id, created_at, due, stability, difficulty, elapsed_days, \
             scheduled_days, state, ease_factor) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                deck_id,
                to_db_timestamp(now),
                to_db_timestamp(memory.due),
                memory.stability,
                memory.difficulty,
                memory.elapsed_days,
                memory.scheduled_days,
                memory.state.to_value(),
                memory.ease_factor,
            ],
        )?;

        Ok(Card::new(self.conn.last_insert_rowid(), deck_id, now))
    }

    fn get_card(&self, id: i64) -> Result<Option<Card>> {
        self.conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id],
                card_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_cards_by_deck(&self, deck_id: i64) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE deck_id = ?1 ORDER BY id"
        ))?;
        let cards = stmt
            .query_map(params![deck_id], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    fn delete_card(&self, id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

impl ReviewRepository for SqliteRepository {
    fn get_reviews(&self, card_id: i64) -> Result<Vec<ReviewLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE card_id = ?1 ORDER BY reviewed_at, id"
        ))?;
        let reviews = stmt
            .query_map(params![card_id], review_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    fn commit_review(&self, outcome: &ReviewOutcome) -> Result<()> {
        let card = &outcome.card;
        let memory = &card.memory;
        let log = &outcome.log;

        if log.card_id != card.id {
            return Err(DbError::InvalidData(format!(
                "review {} belongs to card {}, not {}",
                log.id, log.card_id, card.id
            )));
        }

        // Rolled back on drop unless committed
        let tx = self.conn.unchecked_transaction()?;

        let updated = tx.execute(
            "UPDATE cards SET due = ?1, stability = ?2, difficulty = ?3, elapsed_days = ?4, \
             scheduled_days = ?5, state = ?6, ease_factor = ?7, last_review = ?8 WHERE id = ?9",
            params![
                to_db_timestamp(memory.due),
                memory.stability,
                memory.difficulty,
                memory.elapsed_days,
                memory.scheduled_days,
                memory.state.to_value(),
                memory.ease_factor,
                memory.last_review.map(to_db_timestamp),
                card.id,
            ],
        )?;
        if updated == 0 {
            return Err(DbError::CardNotFound(card.id));
        }

        tx.execute(
            &format!(
                "INSERT INTO reviews ({REVIEW_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                log.id.to_string(),
                log.card_id,
                to_db_timestamp(log.reviewed_at),
                log.rating.to_value(),
                log.response_ms,
                log.state_before.to_value(),
                log.state_after.to_value(),
                log.scheduled_days_before,
                log.scheduled_days_after,
                log.elapsed_days,
                log.stability_before,
                log.stability_after,
                log.difficulty_before,
                log.difficulty_after,
                log.algorithm.as_str(),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn conversion_error(
    idx: usize,
    ty: Type,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn card_state_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<CardState> {
    CardState::from_value(row.get(idx)?).map_err(|e| conversion_error(idx, Type::Integer, e))
}

fn algorithm_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Algorithm> {
    row.get::<_, String>(idx)?
        .parse()
        .map_err(|e| conversion_error(idx, Type::Text, e))
}

fn deck_from_row(row: &Row<'_>) -> rusqlite::Result<Deck> {
    let weights: String = row.get(4)?;
    let weights: Vec<f64> =
        serde_json::from_str(&weights).map_err(|e| conversion_error(4, Type::Text, e))?;

    Ok(Deck {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
        parameters: DeckParameters {
            algorithm: algorithm_column(row, 3)?,
            weights,
            request_retention: row.get(5)?,
            maximum_interval_days: row.get(6)?,
            enable_fuzz: row.get(7)?,
            learning_steps: LearningSteps {
                again_minutes: row.get(8)?,
                hard_minutes: row.get(9)?,
                good_minutes: row.get(10)?,
            },
        },
    })
}

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
        memory: MemoryState {
            due: timestamp_column(row, 3)?,
            stability: row.get(4)?,
            difficulty: row.get(5)?,
            elapsed_days: row.get(6)?,
            scheduled_days: row.get(7)?,
            state: card_state_column(row, 8)?,
            ease_factor: row.get(9)?,
            last_review: optional_timestamp_column(row, 10)?,
        },
    })
}

fn review_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewLog> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| conversion_error(0, Type::Text, e))?;
    let rating =
        Rating::from_value(row.get(3)?).map_err(|e| conversion_error(3, Type::Integer, e))?;

    Ok(ReviewLog {
        id,
        card_id: row.get(1)?,
        reviewed_at: timestamp_column(row, 2)?,
        rating,
        response_ms: row.get(4)?,
        state_before: card_state_column(row, 5)?,
        state_after: card_state_column(row, 6)?,
        scheduled_days_before: row.get(7)?,
        scheduled_days_after: row.get(8)?,
        elapsed_days: row.get(9)?,
        stability_before: row.get(10)?,
        stability_after: row.get(11)?,
        difficulty_before: row.get(12)?,
        difficulty_after: row.get(13)?,
        algorithm: algorithm_column(row, 14)?,
    })
}
