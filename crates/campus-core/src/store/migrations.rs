use super::CampusStore;
use crate::error::{Error, Result};

impl CampusStore {
    /// Run database migrations
    pub(super) async fn migrate(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Internal(format!("migration transaction failed: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'student'
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (users): {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                date TIMESTAMP NOT NULL,
                location TEXT NOT NULL,
                max_attendees INTEGER NOT NULL DEFAULT 100,
                organizer TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                FOREIGN KEY (organizer) REFERENCES users(id)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (events): {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS registrations (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                registered_at TIMESTAMP NOT NULL,
                UNIQUE (event_id, user_id),
                FOREIGN KEY (event_id) REFERENCES events(id)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (registrations): {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Internal(format!("migration failed (idx_events_date): {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_registrations_event ON registrations(event_id)",
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (idx_registrations_event): {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| Error::Internal(format!("migration commit failed: {}", e)))?;

        Ok(())
    }
}
