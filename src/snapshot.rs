//! A single-slot handoff of job snapshots from the fetcher to the tracker.
//!
//! Snapshots are complete listings, so only the freshest one matters: an
//! unconsumed snapshot is overwritten rather than queued behind.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::types::job::Job;

type Slot = Arc<Mutex<Option<Vec<Job>>>>;

#[derive(Clone, Debug)]
pub struct SnapshotSender {
    slot: Slot,
}

#[derive(Debug)]
pub struct SnapshotReceiver {
    slot: Slot,
}

pub fn channel() -> (SnapshotSender, SnapshotReceiver) {
    let slot = Slot::default();
    (
        SnapshotSender { slot: slot.clone() },
        SnapshotReceiver { slot },
    )
}

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Vec<Job>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SnapshotSender {
    /// Makes `jobs` the pending snapshot without waiting for the receiver.
    /// Returns whether an unconsumed snapshot was discarded to do so.
    pub fn publish(&self, jobs: Vec<Job>) -> bool {
        let replaced = lock(&self.slot).replace(jobs).is_some();
        if replaced {
            debug!("discarded unconsumed snapshot");
        }
        replaced
    }
}

impl SnapshotReceiver {
    /// Takes the pending snapshot, if there is one.
    pub fn take(&mut self) -> Option<Vec<Job>> {
        lock(&self.slot).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;

    fn job(id: u64) -> Job {
        Job {
            id,
            blueprint: "Test Item Blueprint I".into(),
            installer: "Fake Character".into(),
            end_date: DateTime::default(),
        }
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let (tx, mut rx) = channel();

        assert_eq!(rx.take(), None);

        assert!(!tx.publish(vec![job(1)]));
        assert!(tx.publish(vec![job(2)]));

        assert_eq!(rx.take(), Some(vec![job(2)]));
        assert_eq!(rx.take(), None);

        assert!(!tx.clone().publish(vec![]));
        assert_eq!(rx.take(), Some(vec![]));
    }
}
