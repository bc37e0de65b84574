//! Registration ledger: sign-ups and their review lifecycle.
//!
//! Registering is open to any authenticated user and is atomic per
//! (event, user) pair; review of registrations belongs to the event's
//! organizer or an admin. Capacity is advisory: approvals are never
//! blocked by `max_attendees`.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::live::{Broadcaster, LiveUpdate};
use crate::model::{Registration, RegistrationDetail, RegistrationStatus, User};
use crate::policy;
use crate::store::CampusStore;

/// Authorized operations over registrations, with live-update fan-out.
#[derive(Clone)]
pub struct RegistrationLedger {
    store: Arc<CampusStore>,
    bus: Broadcaster,
}

impl RegistrationLedger {
    /// Create a ledger over the given store and broadcaster.
    #[must_use]
    pub fn new(store: Arc<CampusStore>, bus: Broadcaster) -> Self {
        Self { store, bus }
    }

    /// Register the caller for an event.
    ///
    /// The event must exist; a second registration for the same pair is a
    /// `Conflict`, even under concurrency. The new registration starts
    /// pending, so the attendee count does not change yet, but clients are
    /// still notified so pending lists refresh.
    pub async fn register(&self, event_id: Uuid, caller: &User) -> Result<Registration> {
        let event = self.store.get_event(event_id).await?;

        let registration = Registration::new(event.id, caller.id);
        self.store.insert_registration(&registration).await?;
        info!(event_id = %event.id, user_id = %caller.id, "registration created");

        let attendee_count = self.store.approved_count(event.id).await?;
        self.bus.publish(LiveUpdate::RegistrationUpdate {
            event_id: event.id,
            attendee_count,
        });
        Ok(registration)
    }

    /// List an event's registrations with registrant identities attached.
    /// Owning organizer or admin only.
    pub async fn list(&self, event_id: Uuid, caller: &User) -> Result<Vec<RegistrationDetail>> {
        let event = self.store.get_event(event_id).await?;
        policy::require_owner_or_admin(caller, event.organizer)?;

        self.store.list_registrations(event.id).await
    }

    /// Approve or reject a registration. Authorization follows the parent
    /// event's ownership.
    ///
    /// Any status may be set from any status, so an organizer can reverse an
    /// earlier decision.
    pub async fn set_status(
        &self,
        registration_id: Uuid,
        status: RegistrationStatus,
        caller: &User,
    ) -> Result<Registration> {
        let mut registration = self.store.get_registration(registration_id).await?;
        let event = self.store.get_event(registration.event_id).await?;
        policy::require_owner_or_admin(caller, event.organizer)?;

        self.store
            .set_registration_status(registration.id, status)
            .await?;
        registration.status = status;
        info!(
            registration_id = %registration.id,
            event_id = %event.id,
            status = %status,
            "registration status set"
        );

        let attendee_count = self.store.approved_count(event.id).await?;
        self.bus.publish(LiveUpdate::RegistrationUpdate {
            event_id: event.id,
            attendee_count,
        });
        self.bus.publish(LiveUpdate::RegistrationStatusChanged {
            user_id: registration.user_id,
            event_id: event.id,
            status,
        });
        Ok(registration)
    }
}
