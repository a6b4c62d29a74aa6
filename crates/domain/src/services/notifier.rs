//! Registration count-update capability.
//!
//! Registration handlers take this capability as an injected dependency so
//! transports can be swapped (or absent) without touching handler logic.

use async_trait::async_trait;
use uuid::Uuid;

/// Notifies interested parties that an event's registration count changed.
///
/// Implementations recompute the current count for the event and publish it to
/// whoever is watching. Invocations are best-effort: a failed or slow
/// notification must never affect the mutation that triggered it.
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    /// Called after a registration for `event_id` was created or deleted.
    async fn registration_changed(&self, event_id: Uuid);
}

/// Notifier used when no push transport is active.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl RegistrationNotifier for NoopNotifier {
    async fn registration_changed(&self, _event_id: Uuid) {}
}
