//! HTTP route handlers

pub mod cards;
pub mod decks;
pub mod study;
