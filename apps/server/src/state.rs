//! Application state.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::db::SqliteRepository;
use crate::error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repository: SqliteRepository, config: Config) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            config: Arc::new(config),
        }
    }

    /// Exclusive access to the repository for the duration of a request.
    pub fn repository(&self) -> Result<MutexGuard<'_, SqliteRepository>, ApiError> {
        self.repository
            .lock()
            .map_err(|_| ApiError::Internal("repository lock poisoned".to_string()))
    }
}
