//! Per-event serialization of event row rewrites.

use boxoffice_core::EventId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held while an event row is loaded, modified and written back.
pub type InventoryGuard = OwnedMutexGuard<()>;

/// Async locks keyed by event, shared by every service that rewrites an
/// event.
///
/// A sale changes `sold_tickets` and an organizer edit changes the other
/// fields, but both write the whole row. Two rewrites of the same event must
/// therefore never interleave, or one of them loses the other's change.
/// Different events never contend.
#[derive(Clone, Default)]
pub struct InventoryLocks {
    locks: Arc<Mutex<HashMap<EventId, Arc<AsyncMutex<()>>>>>,
}

impl InventoryLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `event_id`.
    pub async fn lock(&self, event_id: EventId) -> InventoryGuard {
        let lock = Arc::clone(self.locks.lock().entry(event_id).or_default());
        lock.lock_owned().await
    }

    /// Drops the lock of a deleted event unless someone holds or awaits it.
    pub fn forget(&self, event_id: EventId) {
        let mut locks = self.locks.lock();
        if locks
            .get(&event_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&event_id);
        }
    }

    /// Number of events with a lock allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for InventoryLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryLocks")
            .field("events", &self.len())
            .finish()
    }
}
