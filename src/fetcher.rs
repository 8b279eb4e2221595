//! Periodically fetches the list of industry jobs and hands it to the tracker.
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::clock::Clock;
use crate::feed::{FeedError, JobFeed};
use crate::parser::{parse_jobs, ParsingError};
use crate::snapshot::SnapshotSender;
use crate::util::payload_preview;

/// How much of an unparseable payload to log.
const PREVIEW_LEN: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("fetching jobs: {0}")]
    Feed(#[from] FeedError),

    #[error("parsing jobs: {0}")]
    Parse(#[from] ParsingError),
}

pub struct Fetcher {
    feed: Arc<dyn JobFeed>,
    snapshots: SnapshotSender,
    clock: Arc<dyn Clock>,
}

impl Fetcher {
    pub fn new(
        feed: Arc<dyn JobFeed>,
        snapshots: SnapshotSender,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            feed,
            snapshots,
            clock,
        }
    }

    /// Requests and parses the list of jobs and publishes it as the latest
    /// snapshot, returning how many jobs it contained. Nothing is published on
    /// failure.
    #[instrument(name = "poll", skip_all)]
    pub async fn poll(&self) -> Result<usize, FetchError> {
        let body = self.feed.fetch().await?;

        let jobs = parse_jobs(&body).inspect_err(|_| {
            debug!(payload = payload_preview(&body, PREVIEW_LEN), "bad payload")
        })?;

        let count = jobs.len();
        info!(count, "retrieved jobs");

        self.snapshots.publish(jobs);
        Ok(count)
    }

    /// Polls every `interval`, forever. Failures are logged and the previous
    /// snapshot stays in effect until the next successful poll.
    pub async fn run(self, interval: Duration) {
        loop {
            if let Err(error) = self.poll().await {
                warn!(%error, retry_in = ?interval, "failed to update jobs");
            }
            self.clock.sleep(interval).await;
        }
    }
}
