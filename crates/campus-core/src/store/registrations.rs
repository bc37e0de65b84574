use super::CampusStore;
use crate::error::{Error, Result};
use crate::model::{
    OrganizerRef, Registration, RegistrationDetail, RegistrationRow, RegistrationStatus,
};
use uuid::Uuid;

/// Registration row joined with the registrant's identity
#[derive(Debug, sqlx::FromRow)]
struct RegistrantRow {
    id: String,
    event_id: String,
    user_id: String,
    status: String,
    registered_at: chrono::DateTime<chrono::Utc>,
    name: String,
    email: String,
}

impl CampusStore {
    /// Insert a registration.
    ///
    /// The UNIQUE (event_id, user_id) constraint makes this an atomic
    /// insert-if-absent: two concurrent registrations for the same pair
    /// cannot both land, and the loser surfaces as `Conflict`.
    pub async fn insert_registration(&self, registration: &Registration) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO registrations (id, event_id, user_id, status, registered_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(registration.id.to_string())
        .bind(registration.event_id.to_string())
        .bind(registration.user_id.to_string())
        .bind(registration.status.as_str())
        .bind(registration.registered_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::Conflict("already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a registration by id
    pub async fn get_registration(&self, id: Uuid) -> Result<Registration> {
        let row: RegistrationRow = sqlx::query_as("SELECT * FROM registrations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound("registration"))?;

        row.try_into()
    }

    /// The caller's own registration for an event, if any
    pub async fn find_registration(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>> {
        let row: Option<RegistrationRow> =
            sqlx::query_as("SELECT * FROM registrations WHERE event_id = ? AND user_id = ?")
                .bind(event_id.to_string())
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// All registrations for an event, with registrant name and email attached
    pub async fn list_registrations(&self, event_id: Uuid) -> Result<Vec<RegistrationDetail>> {
        let rows: Vec<RegistrantRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.event_id, r.user_id, r.status, r.registered_at,
                   u.name, u.email
            FROM registrations r
            JOIN users u ON u.id = r.user_id
            WHERE r.event_id = ?
            ORDER BY r.registered_at ASC
            "#,
        )
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let registration: Registration = RegistrationRow {
                    id: row.id,
                    event_id: row.event_id,
                    user_id: row.user_id,
                    status: row.status,
                    registered_at: row.registered_at,
                }
                .try_into()?;
                let user = OrganizerRef {
                    id: registration.user_id,
                    name: row.name,
                    email: row.email,
                };
                Ok(RegistrationDetail { registration, user })
            })
            .collect()
    }

    /// Set a registration's status
    pub async fn set_registration_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE registrations SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("registration"));
        }

        Ok(())
    }

    /// Count of approved registrations for an event (the attendee count)
    pub async fn approved_count(&self, event_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = ? AND status = 'approved'",
        )
        .bind(event_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Remove every registration for an event (cascade of event deletion)
    pub async fn delete_registrations_for_event(&self, event_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM registrations WHERE event_id = ?")
            .bind(event_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
