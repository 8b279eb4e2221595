//! The job tracker: decides when, and whether, to alert about each job.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use itertools::Itertools;
use tracing::{debug, info, instrument, trace, warn};

use crate::clock::Clock;
use crate::config::CharacterConfig;
use crate::notifier::Notifier;
use crate::snapshot::SnapshotReceiver;
use crate::types::job::Job;

/// How long before a job completes that its installer is alerted.
pub const DEFAULT_ALERT_LEAD_TIME: TimeDelta = TimeDelta::seconds(60);

/// Tracks the interesting jobs in the latest snapshot and alerts about each at
/// most once, shortly before it completes.
///
/// Every tracked job is either unalerted and not yet ripe as of when it was
/// first seen, or already alerted (which includes jobs that were ripe when
/// first seen, and so never get alerted).
pub struct JobTracker {
    config: Arc<dyn CharacterConfig>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    snapshots: SnapshotReceiver,
    lead_time: TimeDelta,
    /// job => whether it has been alerted
    jobs: BTreeMap<Job, bool>,
}

impl JobTracker {
    pub fn new(
        config: Arc<dyn CharacterConfig>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        snapshots: SnapshotReceiver,
    ) -> Self {
        Self {
            config,
            clock,
            notifier,
            snapshots,
            lead_time: DEFAULT_ALERT_LEAD_TIME,
            jobs: BTreeMap::new(),
        }
    }

    pub fn with_lead_time(mut self, lead_time: TimeDelta) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Whether a tracked job has been alerted, or `None` if it isn't tracked.
    pub fn is_alerted(&self, job: &Job) -> Option<bool> {
        self.jobs.get(job).copied()
    }

    /// Replaces the tracked jobs with the interesting jobs in `jobs`, a
    /// complete snapshot. Jobs already tracked keep their alerted flag; jobs
    /// that are new but already ripe are marked alerted without alerting.
    pub fn reconcile(&mut self, jobs: Vec<Job>) {
        let now = self.clock.now();
        let before = self.jobs.len();

        let mut previous = std::mem::take(&mut self.jobs);
        let mut added = 0usize;

        for job in jobs {
            if !self.config.is_known(&job.installer)
                || self.jobs.contains_key(&job)
            {
                continue;
            }

            let alerted = match previous.remove(&job) {
                Some(alerted) => alerted,
                None => {
                    added += 1;
                    let ripe = job.end_date - now <= self.lead_time;
                    if ripe {
                        debug!(%job, "first seen when already due, not alerting");
                    } else {
                        trace!(%job, "tracking");
                    }
                    ripe
                },
            };

            self.jobs.insert(job, alerted);
        }

        let removed = previous.len();
        if added > 0 || removed > 0 {
            info!(before, added, removed, after = self.jobs.len(), "reconciled");
        }
    }

    /// Whether `job` is within the lead time of completing.
    pub fn is_ripe(&self, job: &Job) -> bool {
        job.end_date - self.clock.now() <= self.lead_time
    }

    /// Whether another tracked job by the same installer for the same
    /// blueprint takes precedence over `job`: one with an identical end date
    /// and a lower ID, or one ending later but within the lead time.
    pub fn is_superseded(&self, job: &Job) -> bool {
        self.jobs
            .keys()
            .filter(|other| {
                *other != job
                    && other.installer == job.installer
                    && other.blueprint == job.blueprint
            })
            .any(|other| {
                let delta = other.end_date - job.end_date;
                if delta == TimeDelta::zero() {
                    other.id < job.id
                } else {
                    delta > TimeDelta::zero() && delta <= self.lead_time
                }
            })
    }

    /// Reconciles the pending snapshot, if any, then alerts about every ripe
    /// job that hasn't been alerted and isn't superseded.
    ///
    /// Supersession is rechecked on every tick, so a superseded job can still
    /// be alerted if its sibling disappears before alerting.
    #[instrument(name = "tick", skip_all)]
    pub fn tick(&mut self) {
        if let Some(jobs) = self.snapshots.take() {
            self.reconcile(jobs);
        }

        let due: Vec<Job> = self
            .jobs
            .iter()
            .filter(|&(job, &alerted)| !alerted && self.is_ripe(job))
            .filter(|(job, _)| {
                let superseded = self.is_superseded(job);
                if superseded {
                    trace!(%job, "superseded");
                }
                !superseded
            })
            .map(|(job, _)| job.clone())
            .collect();

        for job in due {
            match self.config.alert_destination(&job.installer) {
                Some(destination) => {
                    info!(%job, destination, "alerting");
                    self.notifier.notify(&job, destination);
                },
                None => warn!(%job, "no alert destination configured"),
            }
            self.jobs.insert(job, true);
        }
    }

    /// Ticks every `interval`, forever.
    pub async fn run(mut self, interval: Duration) {
        loop {
            self.tick();
            self.clock.sleep(interval).await;
        }
    }
}

impl fmt::Display for JobTracker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.jobs
                .iter()
                .format_with(", ", |(job, alerted), f| {
                    f(&format_args!("{job} (alerted: {alerted})"))
                })
        )
    }
}
