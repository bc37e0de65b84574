//! Domain model for the campus event registration service.
//!
//! Three persisted collections (users, events, registrations) plus the
//! annotated read views the API and the live-update channel serve.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Default event capacity when none is given
pub const DEFAULT_MAX_ATTENDEES: i64 = 100;

// ============================================================================
// Users
// ============================================================================

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Registers for events
    Student,
    /// Publishes events and reviews registrations for them
    Organizer,
    /// May mutate any event or registration
    Admin,
}

impl Role {
    /// Storage representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Organizer => "organizer",
            Role::Admin => "admin",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "student" => Ok(Role::Student),
            "organizer" => Ok(Role::Organizer),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Internal(format!("unknown role: {}", other))),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account. Email is stored lowercase; lookups are
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct User {
    /// User identifier
    pub id: Uuid,
    /// Unique email, lowercase
    pub email: String,
    /// Salted password digest (never the raw password)
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Role
    pub role: Role,
}

impl User {
    /// Build a new user with a fresh id. The email is lowercased here so the
    /// store's uniqueness constraint doubles as the case-insensitive check.
    #[must_use]
    pub fn new(email: &str, password_hash: String, name: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash,
            name: name.to_string(),
            role,
        }
    }
}

/// Database row for a user
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    /// Identifier (TEXT)
    pub id: String,
    /// Email, lowercase
    pub email: String,
    /// Salted password digest
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Role (TEXT)
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: parse_id(&row.id)?,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            role: Role::parse(&row.role)?,
        })
    }
}

// ============================================================================
// Events
// ============================================================================

/// A published event
#[derive(Debug, Clone)]
pub struct Event {
    /// Event identifier
    pub id: Uuid,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Scheduled date-time; strictly in the future at create/update time
    pub date: DateTime<Utc>,
    /// Location
    pub location: String,
    /// Capacity; advisory only (approvals are never blocked by it)
    pub max_attendees: i64,
    /// Owning organizer
    pub organizer: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Database row for an event
#[derive(Debug, sqlx::FromRow)]
pub struct EventRow {
    /// Identifier (TEXT)
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Scheduled date-time
    pub date: DateTime<Utc>,
    /// Location
    pub location: String,
    /// Capacity
    pub max_attendees: i64,
    /// Owning organizer (TEXT)
    pub organizer: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = Error;

    fn try_from(row: EventRow) -> Result<Self> {
        Ok(Event {
            id: parse_id(&row.id)?,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            max_attendees: row.max_attendees,
            organizer: parse_id(&row.organizer)?,
            created_at: row.created_at,
        })
    }
}

/// Organizer identity attached to event views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerRef {
    /// Organizer id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
}

/// An event annotated with its organizer and the live approved-count.
///
/// The attendee count is never stored; it is recomputed on every read and
/// after every mutation that could change it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Event id
    pub id: Uuid,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Scheduled date-time
    pub date: DateTime<Utc>,
    /// Location
    pub location: String,
    /// Capacity (advisory)
    pub max_attendees: i64,
    /// Owning organizer
    pub organizer: OrganizerRef,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Count of approved registrations
    pub attendee_count: i64,
}

// ============================================================================
// Registrations
// ============================================================================

/// Registration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Awaiting organizer review
    Pending,
    /// Counted toward the attendee count
    Approved,
    /// Declined
    Rejected,
}

impl RegistrationStatus {
    /// Storage representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(Error::Internal(format!(
                "unknown registration status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student's registration for an event.
///
/// At most one exists per (event, user) pair; the store enforces this with a
/// uniqueness constraint so concurrent registrations cannot both succeed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Registration identifier
    pub id: Uuid,
    /// Referenced event
    pub event_id: Uuid,
    /// Registrant
    pub user_id: Uuid,
    /// Status; starts pending
    pub status: RegistrationStatus,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    /// Build a fresh pending registration
    #[must_use]
    pub fn new(event_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status: RegistrationStatus::Pending,
            registered_at: Utc::now(),
        }
    }
}

/// Database row for a registration
#[derive(Debug, sqlx::FromRow)]
pub struct RegistrationRow {
    /// Identifier (TEXT)
    pub id: String,
    /// Referenced event (TEXT)
    pub event_id: String,
    /// Registrant (TEXT)
    pub user_id: String,
    /// Status (TEXT)
    pub status: String,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = Error;

    fn try_from(row: RegistrationRow) -> Result<Self> {
        Ok(Registration {
            id: parse_id(&row.id)?,
            event_id: parse_id(&row.event_id)?,
            user_id: parse_id(&row.user_id)?,
            status: RegistrationStatus::parse(&row.status)?,
            registered_at: row.registered_at,
        })
    }
}

/// A registration joined with the registrant's identity, for organizer review
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetail {
    /// The registration itself
    #[serde(flatten)]
    pub registration: Registration,
    /// Registrant identity
    pub user: OrganizerRef,
}

fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::Internal(format!("corrupt id '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Student, Role::Organizer, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Pending,
            RegistrationStatus::Approved,
            RegistrationStatus::Rejected,
        ] {
            assert_eq!(
                RegistrationStatus::parse(status.as_str()).unwrap(),
                status
            );
        }
        assert!(RegistrationStatus::parse("waitlisted").is_err());
    }

    #[test]
    fn test_new_user_lowercases_email() {
        let user = User::new("Alice@Campus.EDU", "hash".to_string(), "Alice", Role::Student);
        assert_eq!(user.email, "alice@campus.edu");
    }

    #[test]
    fn test_new_registration_starts_pending() {
        let reg = Registration::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(reg.status, RegistrationStatus::Pending);
    }
}
