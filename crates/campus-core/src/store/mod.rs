//! SQLite persistence for users, events, and registrations.
//!
//! One pool, three collections. Registrations carry a uniqueness constraint
//! on (event_id, user_id) so duplicate registration is impossible at the
//! storage layer, not just checked before the write.

mod events;
mod migrations;
mod registrations;
mod users;

#[cfg(test)]
mod tests;

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

use crate::error::{Error, Result};

/// SQLite-backed store for the three collections
pub struct CampusStore {
    pub(super) pool: Pool<Sqlite>,
}

impl CampusStore {
    /// Open (or create) the database at the given path and run migrations
    pub async fn from_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Internal(format!("failed to create data directory: {}", e)))?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }
}
