//! Controllable time source for deterministic tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use stipend_core::Clock;

/// A clock that only moves when the test says so.
///
/// Clones share the same underlying time, so a test can hand one clone to
/// the ledger and keep another to advance.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<u64>>,
}

impl ManualClock {
    /// Start the clock at `initial` Unix seconds.
    pub fn new(initial: u64) -> Self {
        Self {
            now: Arc::new(Mutex::new(initial)),
        }
    }

    /// Advance by `seconds`.
    pub fn advance(&self, seconds: u64) {
        #[allow(clippy::unwrap_used)]
        let mut now = self.now.lock().unwrap();
        *now = now.saturating_add(seconds);
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, timestamp: u64) {
        #[allow(clippy::unwrap_used)]
        let mut now = self.now.lock().unwrap();
        *now = timestamp;
    }

    /// Current time without going through the effect interface.
    pub fn current(&self) -> u64 {
        #[allow(clippy::unwrap_used)]
        let now = self.now.lock().unwrap();
        *now
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn unix_now(&self) -> u64 {
        self.current()
    }
}
