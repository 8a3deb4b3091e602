//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Per-connection settings; SQLite leaves foreign keys off by default.
pub const PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
"#;

/// Complete schema for the Quint database.
pub const SCHEMA: &str = r#"
-- Decks and their scheduler parameters
CREATE TABLE IF NOT EXISTS decks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    algorithm TEXT NOT NULL DEFAULT 'fsrs',
    weights TEXT NOT NULL,
    request_retention REAL NOT NULL DEFAULT 0.9,
    maximum_interval_days INTEGER NOT NULL DEFAULT 36500,
    enable_fuzz INTEGER NOT NULL DEFAULT 1,
    again_step_minutes INTEGER NOT NULL DEFAULT 10,
    hard_step_minutes INTEGER NOT NULL DEFAULT 60,
    good_step_minutes INTEGER NOT NULL DEFAULT 1440
);

-- Cards with their memory state
CREATE TABLE IF NOT EXISTS cards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    deck_id INTEGER NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    due TEXT NOT NULL,
    stability REAL NOT NULL DEFAULT 0,
    difficulty REAL NOT NULL DEFAULT 0,
    elapsed_days INTEGER NOT NULL DEFAULT 0,
    scheduled_days INTEGER NOT NULL DEFAULT 0,
    state INTEGER NOT NULL DEFAULT 0,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    last_review TEXT
);

-- Review log, one row per scheduling decision
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    card_id INTEGER NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
    reviewed_at TEXT NOT NULL,
    rating INTEGER NOT NULL,
    response_ms INTEGER,
    state_before INTEGER NOT NULL,
    state_after INTEGER NOT NULL,
    scheduled_days_before INTEGER NOT NULL,
    scheduled_days_after INTEGER NOT NULL,
    elapsed_days INTEGER NOT NULL,
    stability_before REAL NOT NULL,
    stability_after REAL NOT NULL,
    difficulty_before REAL NOT NULL,
    difficulty_after REAL NOT NULL,
    algorithm TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_cards_deck ON cards(deck_id);
CREATE INDEX IF NOT EXISTS idx_cards_due ON cards(due);
CREATE INDEX IF NOT EXISTS idx_reviews_card ON reviews(card_id);
CREATE INDEX IF NOT EXISTS idx_reviews_reviewed_at ON reviews(reviewed_at);
"#;

