//! Tracks industry jobs fetched from the EVE Online XML API and alerts their
//! installers shortly before each job completes.
pub mod clock;
pub mod config;
pub mod feed;
pub mod fetcher;
pub mod notifier;
pub mod parser;
pub mod snapshot;
pub mod tracker;
pub mod types;
pub mod util;
