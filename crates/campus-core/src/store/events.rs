use super::CampusStore;
use crate::error::{Error, Result};
use crate::model::{Event, EventRow};
use chrono::{DateTime, Utc};
use uuid::Uuid;

impl CampusStore {
    /// Insert a new event
    pub async fn create_event(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, date, location,
                max_attendees, organizer, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.to_string())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.max_attendees)
        .bind(event.organizer.to_string())
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get an event by id
    pub async fn get_event(&self, id: Uuid) -> Result<Event> {
        let row: EventRow = sqlx::query_as("SELECT * FROM events WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound("event"))?;

        row.try_into()
    }

    /// List all events in creation order
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as("SELECT * FROM events ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Replace an event row in full; field merging happens in the catalog
    pub async fn update_event(&self, event: &Event) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE events SET
                title = ?, description = ?, date = ?, location = ?,
                max_attendees = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.max_attendees)
        .bind(event.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("event"));
        }

        Ok(())
    }

    /// Delete an event
    pub async fn delete_event(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("event"));
        }

        Ok(())
    }

    /// Events whose scheduled date lies before the cutoff (sweeper input)
    pub async fn list_events_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> =
            sqlx::query_as("SELECT * FROM events WHERE date < ? ORDER BY date ASC")
                .bind(cutoff)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
