//! Shared application state.

use crate::error::ApiError;
use actix_web::web;
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

/// One SQLite connection shared by all workers.
///
/// Jobs run on the blocking pool and hold the connection for their whole
/// duration, so each service call sees a consistent database.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `job` against the connection off the async executor.
    ///
    /// A job that panicked leaves the lock poisoned but the connection
    /// clean: its open transaction was rolled back when it unwound. The
    /// next job takes the connection over instead of failing.
    pub async fn run<T, E, F>(&self, job: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        E: Into<ApiError> + Send + 'static,
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let outcome = web::block(move || {
            let guard = conn.lock().unwrap_or_else(|poisoned| {
                warn!("event=db_lock module=http status=recovered reason=poisoned");
                conn.clear_poison();
                PoisonError::into_inner(poisoned)
            });
            job(&guard)
        })
        .await
        .map_err(ApiError::internal)?;
        outcome.map_err(Into::into)
    }
}
