//! Live registration-count fan-out.
//!
//! One broadcast channel per event id. WebSocket sessions subscribe to the
//! events they have joined; registration handlers publish through the
//! `RegistrationNotifier` capability after a successful mutation. Delivery is
//! best-effort: there is no replay for late subscribers, and a lagging
//! receiver simply misses intermediate updates.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use domain::models::registration::RegistrationUpdate;
use domain::services::RegistrationNotifier;
use persistence::repositories::{EventRepository, RegistrationRepository};

/// Per-event broadcast channel capacity.
const CHANNEL_CAPACITY: usize = 64;

/// Hub keeping one broadcast channel per event with active watchers.
pub struct LiveUpdateHub {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<RegistrationUpdate>>>,
    events: EventRepository,
    registrations: RegistrationRepository,
}

impl LiveUpdateHub {
    /// Creates a new hub over the given pool.
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self {
            channels: RwLock::new(HashMap::new()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool),
        })
    }

    /// Subscribes to updates for one event, creating its channel on demand.
    pub async fn subscribe(&self, event_id: Uuid) -> broadcast::Receiver<RegistrationUpdate> {
        let mut channels = self.channels.write().await;
        channels
            .entry(event_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publishes an update to the event's watchers, dropping the channel once
    /// nobody is listening.
    pub async fn broadcast(&self, update: RegistrationUpdate) {
        let mut channels = self.channels.write().await;
        if let Some(sender) = channels.get(&update.event_id) {
            if sender.send(update.clone()).is_err() || sender.receiver_count() == 0 {
                channels.remove(&update.event_id);
            }
        }
    }

    /// Number of events currently having at least one channel.
    pub async fn watched_events(&self) -> usize {
        self.channels.read().await.len()
    }
}

#[async_trait]
impl RegistrationNotifier for LiveUpdateHub {
    async fn registration_changed(&self, event_id: Uuid) {
        // Recompute the count at publish time so watchers always see the
        // store's current state, not the mutating handler's view of it.
        let event = match self.events.find_by_id(event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!(event_id = %event_id, "Skipping update for deleted event");
                return;
            }
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Failed to load event for live update");
                return;
            }
        };

        let registration_count = match self.registrations.count_by_event_id(event_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Failed to count registrations for live update");
                return;
            }
        };

        self.broadcast(RegistrationUpdate {
            event_id,
            registration_count,
            is_full: registration_count >= i64::from(event.max_registrations),
        })
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn lazy_pool() -> PgPool {
        // Never actually connects; channel tests exercise only the hub.
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/eventhub_test")
            .unwrap()
    }

    fn update(event_id: Uuid, count: i64) -> RegistrationUpdate {
        RegistrationUpdate {
            event_id,
            registration_count: count,
            is_full: false,
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_broadcast() {
        let hub = LiveUpdateHub::new(lazy_pool());
        let event_id = Uuid::new_v4();

        let mut rx = hub.subscribe(event_id).await;
        hub.broadcast(update(event_id, 3)).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_id, event_id);
        assert_eq!(received.registration_count, 3);
    }

    #[tokio::test]
    async fn test_updates_are_scoped_to_joined_event() {
        let hub = LiveUpdateHub::new(lazy_pool());
        let watched = Uuid::new_v4();
        let other = Uuid::new_v4();

        let mut rx = hub.subscribe(watched).await;
        hub.broadcast(update(other, 1)).await;
        hub.broadcast(update(watched, 2)).await;

        // Only the watched event's update arrives.
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_id, watched);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_watchers_is_noop() {
        let hub = LiveUpdateHub::new(lazy_pool());
        hub.broadcast(update(Uuid::new_v4(), 1)).await;
        assert_eq!(hub.watched_events().await, 0);
    }

    #[tokio::test]
    async fn test_channel_dropped_after_last_watcher_leaves() {
        let hub = LiveUpdateHub::new(lazy_pool());
        let event_id = Uuid::new_v4();

        let rx = hub.subscribe(event_id).await;
        assert_eq!(hub.watched_events().await, 1);

        drop(rx);
        hub.broadcast(update(event_id, 1)).await;
        assert_eq!(hub.watched_events().await, 0);
    }

    #[tokio::test]
    async fn test_multiple_watchers_all_receive() {
        let hub = LiveUpdateHub::new(lazy_pool());
        let event_id = Uuid::new_v4();

        let mut rx1 = hub.subscribe(event_id).await;
        let mut rx2 = hub.subscribe(event_id).await;
        hub.broadcast(update(event_id, 5)).await;

        assert_eq!(rx1.recv().await.unwrap().registration_count, 5);
        assert_eq!(rx2.recv().await.unwrap().registration_count, 5);
    }
}
