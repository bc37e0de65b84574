use super::LiveUpdate;
use tokio::sync::broadcast;

/// Broadcast channel carrying [`LiveUpdate`]s to every connected client.
///
/// Cloning is cheap; all clones share the same underlying channel.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: broadcast::Sender<LiveUpdate>,
}

impl Broadcaster {
    /// Create a broadcaster with the given channel capacity.
    ///
    /// Capacity bounds how far a slow subscriber can fall behind before it
    /// starts missing updates. 256 is a reasonable default.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future updates.
    ///
    /// Each subscriber gets an independent copy of every published update.
    /// A subscriber more than `capacity` updates behind sees
    /// `RecvError::Lagged` on its next recv.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveUpdate> {
        self.sender.subscribe()
    }

    /// Publish an update to all active subscribers.
    ///
    /// Returns the number of subscribers that received it. With no
    /// subscribers the update is silently dropped.
    pub fn publish(&self, update: LiveUpdate) -> usize {
        // send() errors only when there are no receivers, which is fine
        self.sender.send(update).unwrap_or(0)
    }

    /// Current number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = Broadcaster::new(16);
        let mut rx = bus.subscribe();

        let id = Uuid::new_v4();
        bus.publish(LiveUpdate::EventDeleted { event_id: id });

        let update = rx.recv().await.unwrap();
        assert_eq!(update.event_id(), id);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = Broadcaster::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        let id = Uuid::new_v4();
        let count = bus.publish(LiveUpdate::RegistrationUpdate {
            event_id: id,
            attendee_count: 3,
        });
        assert_eq!(count, 2);

        assert_eq!(rx1.recv().await.unwrap().event_id(), id);
        assert_eq!(rx2.recv().await.unwrap().event_id(), id);
    }

    #[test]
    fn test_publish_no_subscribers() {
        let bus = Broadcaster::new(16);
        let count = bus.publish(LiveUpdate::EventDeleted {
            event_id: Uuid::new_v4(),
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn test_wire_shape() {
        let update = LiveUpdate::RegistrationUpdate {
            event_id: Uuid::nil(),
            attendee_count: 5,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "registrationUpdate");
        assert_eq!(json["attendeeCount"], 5);
        assert!(json["eventId"].is_string());

        let update = LiveUpdate::RegistrationStatusChanged {
            user_id: Uuid::nil(),
            event_id: Uuid::nil(),
            status: crate::model::RegistrationStatus::Approved,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "registrationStatusChanged");
        assert_eq!(json["status"], "approved");
        assert!(json["userId"].is_string());
    }
}
