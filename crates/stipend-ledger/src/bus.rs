//! Event fan-out.
//!
//! Engines publish a `LedgerEvent` after each committed mutation.
//! Observers attach through an explicit [`EventSubscription`] handle
//! rather than ambient global listeners: dropping the handle (or calling
//! [`EventSubscription::cancel`]) detaches the observer, so a torn-down
//! UI cannot leak a registration.
//!
//! Delivery is at-least-once per attached observer. Events for one owner
//! arrive in the order their mutations committed, because engines publish
//! while still holding that owner's serialization lock; no ordering is
//! promised across owners.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use stipend_core::LedgerEvent;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Publish/subscribe fan-out for ledger events.
#[derive(Default)]
pub struct NotificationBus {
    observers: Mutex<HashMap<Uuid, mpsc::UnboundedSender<LedgerEvent>>>,
}

impl NotificationBus {
    /// Create a bus with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer. The handle detaches on drop.
    pub fn subscribe(self: &Arc<Self>) -> EventSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        #[allow(clippy::unwrap_used)] // lock poisoning requires a prior panic
        self.observers.lock().unwrap().insert(id, tx);
        debug!(observer = %id, "event observer attached");
        EventSubscription {
            id,
            receiver: rx,
            bus: Arc::downgrade(self),
        }
    }

    /// Deliver an event to every attached observer.
    ///
    /// Observers whose handle was dropped without running its destructor
    /// (e.g. a leaked handle) are pruned here.
    pub fn publish(&self, event: &LedgerEvent) {
        #[allow(clippy::unwrap_used)]
        let mut observers = self.observers.lock().unwrap();
        observers.retain(|id, tx| {
            if tx.send(event.clone()).is_ok() {
                true
            } else {
                warn!(observer = %id, "dropping closed event observer");
                false
            }
        });
        debug!(observers = observers.len(), ?event, "event published");
    }

    /// Number of currently attached observers.
    pub fn observer_count(&self) -> usize {
        #[allow(clippy::unwrap_used)]
        let observers = self.observers.lock().unwrap();
        observers.len()
    }

    fn detach(&self, id: Uuid) {
        #[allow(clippy::unwrap_used)]
        let mut observers = self.observers.lock().unwrap();
        if observers.remove(&id).is_some() {
            debug!(observer = %id, "event observer detached");
        }
    }
}

/// Handle for one attached observer.
pub struct EventSubscription {
    id: Uuid,
    receiver: mpsc::UnboundedReceiver<LedgerEvent>,
    bus: Weak<NotificationBus>,
}

impl EventSubscription {
    /// Wait for the next event. Returns `None` once the bus is gone and
    /// all buffered events are drained.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        self.receiver.recv().await
    }

    /// Take the next already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<LedgerEvent> {
        self.receiver.try_recv().ok()
    }

    /// Detach explicitly. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.detach(self.id);
        }
    }
}
