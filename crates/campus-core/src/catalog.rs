//! Event catalog: the authorized CRUD surface over stored events.
//!
//! Every mutation checks authorization through [`crate::policy`], validates
//! its input, writes through the store, and publishes a [`LiveUpdate`] so
//! connected clients see the change without polling.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::live::{Broadcaster, LiveUpdate};
use crate::model::{
    Event, EventRecord, OrganizerRef, Registration, Role, User, DEFAULT_MAX_ATTENDEES,
};
use crate::policy;
use crate::store::CampusStore;

/// Input for creating an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Scheduled date-time; must be in the future
    pub date: DateTime<Utc>,
    /// Location
    pub location: String,
    /// Capacity; defaults to 100 when absent
    pub max_attendees: Option<i64>,
}

/// Partial update for an event; absent fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New date; must be in the future when present
    pub date: Option<DateTime<Utc>>,
    /// New location
    pub location: Option<String>,
    /// New capacity
    pub max_attendees: Option<i64>,
}

/// Authorized CRUD over events, with live-update fan-out.
#[derive(Clone)]
pub struct EventCatalog {
    store: Arc<CampusStore>,
    bus: Broadcaster,
}

impl EventCatalog {
    /// Create a catalog over the given store and broadcaster.
    #[must_use]
    pub fn new(store: Arc<CampusStore>, bus: Broadcaster) -> Self {
        Self { store, bus }
    }

    /// List all events in creation order, annotated with organizer and
    /// attendee count.
    pub async fn list(&self) -> Result<Vec<EventRecord>> {
        let events = self.store.list_events().await?;
        let mut records = Vec::with_capacity(events.len());
        for event in events {
            records.push(self.annotate(event).await?);
        }
        Ok(records)
    }

    /// Fetch a single event, plus the caller's own registration for it when
    /// one exists.
    pub async fn get(
        &self,
        id: Uuid,
        caller: Option<&User>,
    ) -> Result<(EventRecord, Option<Registration>)> {
        let event = self.store.get_event(id).await?;
        let own = match caller {
            Some(user) => self.store.find_registration(id, user.id).await?,
            None => None,
        };
        Ok((self.annotate(event).await?, own))
    }

    /// Publish a new event. Organizer or admin only; the date must lie in
    /// the future.
    pub async fn create(&self, input: NewEvent, caller: &User) -> Result<EventRecord> {
        policy::require_role(caller, &[Role::Organizer, Role::Admin])?;
        validate_title(&input.title)?;
        validate_date(input.date)?;
        if let Some(max_attendees) = input.max_attendees {
            validate_capacity(max_attendees)?;
        }

        let event = Event {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            date: input.date,
            location: input.location,
            max_attendees: input.max_attendees.unwrap_or(DEFAULT_MAX_ATTENDEES),
            organizer: caller.id,
            created_at: Utc::now(),
        };
        self.store.create_event(&event).await?;
        info!(event_id = %event.id, organizer = %caller.id, "event created");

        let record = self.annotate(event).await?;
        self.bus.publish(LiveUpdate::EventCreated {
            event: record.clone(),
        });
        Ok(record)
    }

    /// Apply a partial update. Only the owning organizer or an admin may
    /// update; a new date must lie in the future.
    pub async fn update(&self, id: Uuid, patch: EventPatch, caller: &User) -> Result<EventRecord> {
        let mut event = self.store.get_event(id).await?;
        policy::require_owner_or_admin(caller, event.organizer)?;

        if let Some(date) = patch.date {
            validate_date(date)?;
            event.date = date;
        }
        if let Some(title) = patch.title {
            validate_title(&title)?;
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(location) = patch.location {
            event.location = location;
        }
        if let Some(max_attendees) = patch.max_attendees {
            validate_capacity(max_attendees)?;
            event.max_attendees = max_attendees;
        }

        self.store.update_event(&event).await?;
        info!(event_id = %id, "event updated");

        let record = self.annotate(event).await?;
        self.bus.publish(LiveUpdate::EventUpdated {
            event: record.clone(),
        });
        Ok(record)
    }

    /// Delete an event and every registration under it. Only the owning
    /// organizer or an admin may delete.
    pub async fn delete(&self, id: Uuid, caller: &User) -> Result<()> {
        let event = self.store.get_event(id).await?;
        policy::require_owner_or_admin(caller, event.organizer)?;

        let removed = self.store.delete_registrations_for_event(id).await?;
        self.store.delete_event(id).await?;
        info!(event_id = %id, registrations = removed, "event deleted");

        self.bus.publish(LiveUpdate::EventDeleted { event_id: id });
        Ok(())
    }

    /// Attach the organizer's identity and the current approved count.
    pub(crate) async fn annotate(&self, event: Event) -> Result<EventRecord> {
        let organizer = self.store.get_user(event.organizer).await.map_err(|e| {
            // An event without its organizer row is a data integrity fault
            match e {
                Error::NotFound(_) => Error::Internal(format!(
                    "event {} references missing organizer {}",
                    event.id, event.organizer
                )),
                other => other,
            }
        })?;
        let attendee_count = self.store.approved_count(event.id).await?;

        Ok(EventRecord {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            max_attendees: event.max_attendees,
            organizer: OrganizerRef {
                id: organizer.id,
                name: organizer.name,
                email: organizer.email,
            },
            created_at: event.created_at,
            attendee_count,
        })
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

// Capacity is advisory at registration time but still has to be a
// positive number.
fn validate_capacity(max_attendees: i64) -> Result<()> {
    if max_attendees <= 0 {
        return Err(Error::Validation(
            "max attendees must be positive".to_string(),
        ));
    }
    Ok(())
}

fn validate_date(date: DateTime<Utc>) -> Result<()> {
    if date <= Utc::now() {
        return Err(Error::Validation(
            "event date must be in the future".to_string(),
        ));
    }
    Ok(())
}
