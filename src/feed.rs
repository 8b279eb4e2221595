//! Sources of raw industry job listings.
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

pub const DEFAULT_API_URL: &str =
    "https://api.eveonline.com/corp/IndustryJobs.xml.aspx";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait JobFeed: Send + Sync {
    /// Fetches the current, complete job listing.
    async fn fetch(&self) -> Result<Bytes, FeedError>;
}

/// Fetches a corporation's industry jobs from the XML API.
#[derive(Debug)]
pub struct XmlApiFeed {
    url: String,
    key_id: String,
    vcode: String,
    client: reqwest::Client,
}

impl XmlApiFeed {
    pub fn new(url: String, key_id: String, vcode: String) -> Self {
        Self {
            url,
            key_id,
            vcode,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl JobFeed for XmlApiFeed {
    async fn fetch(&self) -> Result<Bytes, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("keyID", &self.key_id), ("vCode", &self.vcode)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?)
    }
}

/// Serves a fixed response, which can be swapped out between fetches.
#[derive(Debug)]
pub struct FakeFeed {
    response: Mutex<Result<Bytes, String>>,
}

impl FakeFeed {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            response: Mutex::new(Ok(body.into())),
        }
    }

    pub fn set_response(&self, body: impl Into<Bytes>) {
        *self.lock() = Ok(body.into());
    }

    /// Makes subsequent fetches fail with `reason`.
    pub fn set_failure(&self, reason: impl Into<String>) {
        *self.lock() = Err(reason.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Result<Bytes, String>> {
        self.response.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl JobFeed for FakeFeed {
    async fn fetch(&self) -> Result<Bytes, FeedError> {
        self.lock().clone().map_err(FeedError::Unavailable)
    }
}
