use super::CampusStore;
use crate::error::{Error, Result};
use crate::model::{User, UserRow};
use uuid::Uuid;

impl CampusStore {
    /// Insert a new user.
    ///
    /// The email uniqueness constraint does the duplicate check atomically;
    /// a violation maps to `Validation` (duplicate email), matching the
    /// registration endpoint's contract.
    pub async fn create_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, role)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::Validation("email already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by id
    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound("user"))?;

        row.try_into()
    }

    /// Look up a user by email, case-insensitively.
    ///
    /// Emails are stored lowercase, so lowercasing the probe is the whole
    /// case-insensitivity story.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }
}
