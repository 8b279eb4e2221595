//! Wall-clock abstraction, so the tracker and fetcher can run against virtual
//! time in tests.
use std::future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Waits until `duration` has passed according to this clock.
    async fn sleep(&self, duration: Duration);
}

/// The real clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct FakeClock {
    time: Arc<watch::Sender<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        let (time, _) = watch::channel(start);
        Self {
            time: Arc::new(time),
        }
    }

    /// Moves time forward, waking any sleepers whose deadline has now passed.
    pub fn advance(&self, duration: Duration) {
        let Ok(delta) = TimeDelta::from_std(duration) else {
            return;
        };
        self.time.send_modify(|now| {
            if let Some(later) = now.checked_add_signed(delta) {
                *now = later;
            }
        });
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(DateTime::default())
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.borrow()
    }

    async fn sleep(&self, duration: Duration) {
        let deadline = TimeDelta::from_std(duration)
            .ok()
            .and_then(|delta| self.now().checked_add_signed(delta));

        // Unrepresentable deadlines are never reached.
        let Some(deadline) = deadline else {
            return future::pending().await;
        };

        let mut rx = self.time.subscribe();
        // The sender lives as long as self, so this cannot fail.
        let _ = rx.wait_for(|now| *now >= deadline).await;
    }
}
