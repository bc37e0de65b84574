use crate::model::{EventRecord, RegistrationStatus};
use serde::Serialize;
use uuid::Uuid;

/// Updates pushed to connected clients when shared state changes.
///
/// Serializes as `{"type": "eventCreated", ...}` with camelCase fields,
/// which is the shape clients switch on.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LiveUpdate {
    /// A new event was published to the catalog
    EventCreated {
        /// The freshly created event, annotated with organizer and count
        event: EventRecord,
    },
    /// An existing event's details changed
    EventUpdated {
        /// The event after the update
        event: EventRecord,
    },
    /// An event was removed, along with all of its registrations
    EventDeleted {
        /// Identifier of the removed event
        event_id: Uuid,
    },
    /// An event's attendee count changed
    RegistrationUpdate {
        /// Event whose count changed
        event_id: Uuid,
        /// Current number of approved registrations
        attendee_count: i64,
    },
    /// A specific attendee's registration was approved or rejected
    RegistrationStatusChanged {
        /// The attendee whose registration changed
        user_id: Uuid,
        /// Event the registration belongs to
        event_id: Uuid,
        /// The new status
        status: RegistrationStatus,
    },
}

impl LiveUpdate {
    /// The event this update concerns.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::EventCreated { event } | Self::EventUpdated { event } => event.id,
            Self::EventDeleted { event_id }
            | Self::RegistrationUpdate { event_id, .. }
            | Self::RegistrationStatusChanged { event_id, .. } => *event_id,
        }
    }
}
