//! Clock effect interface.
//!
//! Payment due-times are pure functions of the clock, so the ledger reads
//! time through this trait instead of calling the system clock directly.
//! Production code uses [`SystemClock`]; tests use the controllable clock
//! in `stipend-testkit` to make every timing property deterministic.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current Unix time.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds.
    async fn unix_now(&self) -> u64;
}

#[async_trait]
impl<T: Clock + ?Sized> Clock for Arc<T> {
    async fn unix_now(&self) -> u64 {
        (**self).unix_now().await
    }
}

/// Production clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a system clock.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clock for SystemClock {
    async fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }
}
