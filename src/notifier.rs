//! Delivers alerts to people.
use std::sync::{Mutex, PoisonError};

use serde::Deserialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::types::job::Job;

const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";
const SLACK_BOT_NAME: &str = "ijns";

/// Alerts a user about a job.
///
/// Delivery is fire-and-forget: implementations log failures rather than
/// report them, and callers treat the job as alerted either way.
pub trait Notifier: Send + Sync {
    fn notify(&self, job: &Job, destination: &str);
}

/// Sends alerts as Slack direct messages from a bot user.
#[derive(Debug)]
pub struct SlackNotifier {
    token: String,
    client: reqwest::Client,
    runtime: Handle,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackNotifier {
    /// Must be called from within a tokio runtime, on which deliveries will be
    /// spawned.
    pub fn new(token: String) -> Self {
        Self {
            token,
            client: reqwest::Client::new(),
            runtime: Handle::current(),
        }
    }
}

impl Notifier for SlackNotifier {
    fn notify(&self, job: &Job, destination: &str) {
        let body = serde_json::json!({
            "channel": format!("@{destination}"),
            "text": job.to_string(),
            "username": SLACK_BOT_NAME,
        });
        let request = self
            .client
            .post(SLACK_POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(&body);
        let destination = destination.to_owned();
        let job_id = job.id;

        self.runtime.spawn(async move {
            let response = match request.send().await {
                Ok(r) => r,
                Err(error) => {
                    warn!(%error, job_id, %destination, "failed to send alert");
                    return;
                },
            };

            match response.json::<SlackResponse>().await {
                Ok(SlackResponse { ok: true, .. }) => {
                    debug!(job_id, %destination, "alert delivered")
                },
                Ok(SlackResponse { error, .. }) => warn!(
                    error = error.as_deref().unwrap_or("unknown"),
                    job_id,
                    %destination,
                    "slack rejected alert"
                ),
                Err(error) => {
                    warn!(%error, job_id, %destination, "bad response from slack")
                },
            }
        });
    }
}

/// An alert recorded by a `FakeNotifier`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alert {
    pub job: Job,
    pub destination: String,
}

/// Records alerts instead of delivering them.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every alert recorded so far, oldest first.
    pub fn take_alerts(&self) -> Vec<Alert> {
        std::mem::take(
            &mut *self.alerts.lock().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl Notifier for FakeNotifier {
    fn notify(&self, job: &Job, destination: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Alert {
                job: job.clone(),
                destination: destination.to_owned(),
            });
    }
}
