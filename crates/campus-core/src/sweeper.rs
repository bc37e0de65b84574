//! Background sweeper that removes long-expired events.
//!
//! Events whose scheduled date is more than a grace period in the past are
//! deleted together with their registrations, and an event-deleted update is
//! broadcast for each so clients drop them from view. The sweep runs once at
//! startup and then on a fixed interval.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::live::{Broadcaster, LiveUpdate};
use crate::store::CampusStore;

/// How long past its date an event survives before the sweeper removes it
pub const GRACE_HOURS: i64 = 24;

/// Seconds between sweeps
pub const SWEEP_INTERVAL_SECS: u64 = 3600;

/// Periodic deleter of expired events.
#[derive(Clone)]
pub struct ExpirySweeper {
    store: Arc<CampusStore>,
    bus: Broadcaster,
}

impl ExpirySweeper {
    /// Create a sweeper over the given store and broadcaster.
    #[must_use]
    pub fn new(store: Arc<CampusStore>, bus: Broadcaster) -> Self {
        Self { store, bus }
    }

    /// Run the sweep loop until the token is cancelled.
    ///
    /// Sweeps once immediately so a restart does not leave stale events
    /// sitting around for up to an hour.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("expiry sweeper starting");

        if let Err(e) = self.sweep_once(Utc::now()).await {
            error!("initial sweep failed: {}", e);
        }

        let interval = tokio::time::Duration::from_secs(SWEEP_INTERVAL_SECS);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.sweep_once(Utc::now()).await {
                        error!("sweep failed: {}", e);
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("expiry sweeper shutting down");
                    break;
                }
            }
        }
    }

    /// Delete every event dated more than the grace period before `now`,
    /// cascading to its registrations and broadcasting each removal.
    ///
    /// A failure on one event is logged and the sweep moves on, so a single
    /// bad row cannot wedge the loop. Returns how many events were removed.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now - Duration::hours(GRACE_HOURS);
        let expired = self.store.list_events_before(cutoff).await?;

        let mut removed = 0;
        for event in expired {
            if let Err(e) = self.remove(&event.id).await {
                warn!(event_id = %event.id, "failed to sweep expired event: {}", e);
                continue;
            }
            info!(event_id = %event.id, date = %event.date, "swept expired event");
            removed += 1;
        }
        Ok(removed)
    }

    async fn remove(&self, event_id: &uuid::Uuid) -> Result<()> {
        self.store.delete_registrations_for_event(*event_id).await?;
        self.store.delete_event(*event_id).await?;
        self.bus.publish(LiveUpdate::EventDeleted {
            event_id: *event_id,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Event, Registration, Role, User};
    use tempfile::TempDir;
    use uuid::Uuid;

    struct TestContext {
        sweeper: ExpirySweeper,
        store: Arc<CampusStore>,
        bus: Broadcaster,
        _dir: TempDir,
    }

    async fn create_test_context() -> TestContext {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(
            CampusStore::from_path(&dir.path().join("sweeper.db"))
                .await
                .unwrap(),
        );
        let bus = Broadcaster::new(16);
        TestContext {
            sweeper: ExpirySweeper::new(store.clone(), bus.clone()),
            store,
            bus,
            _dir: dir,
        }
    }

    // Each event gets its own organizer row so the foreign key on
    // events.organizer is satisfied.
    async fn seed_event(ctx: &TestContext, date: DateTime<Utc>) -> Event {
        let organizer = User::new(
            &format!("org-{}@campus.edu", Uuid::new_v4()),
            "salt$digest".to_string(),
            "Sweeper Organizer",
            Role::Organizer,
        );
        ctx.store.create_user(&organizer).await.unwrap();

        let event = Event {
            id: Uuid::new_v4(),
            title: "Workshop".to_string(),
            description: "Hands-on workshop".to_string(),
            date,
            location: "Room 5".to_string(),
            max_attendees: 100,
            organizer: organizer.id,
            created_at: Utc::now(),
        };
        ctx.store.create_event(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn test_sweeps_only_past_grace_period() {
        let ctx = create_test_context().await;
        let now = Utc::now();

        let stale = seed_event(&ctx, now - Duration::hours(25)).await;
        let recent = seed_event(&ctx, now - Duration::hours(12)).await;
        let upcoming = seed_event(&ctx, now + Duration::days(1)).await;

        let removed = ctx.sweeper.sweep_once(now).await.unwrap();
        assert_eq!(removed, 1);

        assert!(matches!(
            ctx.store.get_event(stale.id).await,
            Err(Error::NotFound("event"))
        ));
        assert!(ctx.store.get_event(recent.id).await.is_ok());
        assert!(ctx.store.get_event(upcoming.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_sweep_cascades_and_broadcasts() {
        let ctx = create_test_context().await;
        let now = Utc::now();

        let stale = seed_event(&ctx, now - Duration::hours(48)).await;
        ctx.store
            .insert_registration(&Registration::new(stale.id, Uuid::new_v4()))
            .await
            .unwrap();

        let mut rx = ctx.bus.subscribe();
        ctx.sweeper.sweep_once(now).await.unwrap();

        assert!(ctx
            .store
            .list_registrations(stale.id)
            .await
            .unwrap()
            .is_empty());
        match rx.recv().await.unwrap() {
            LiveUpdate::EventDeleted { event_id } => assert_eq!(event_id, stale.id),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sweep_with_nothing_expired() {
        let ctx = create_test_context().await;
        seed_event(&ctx, Utc::now() + Duration::days(3)).await;

        let removed = ctx.sweeper.sweep_once(Utc::now()).await.unwrap();
        assert_eq!(removed, 0);
    }
}
