mod args;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::TimeDelta;
use clap::Parser;
use ijns::clock::{Clock, SystemClock};
use ijns::config::{CharacterConfig, YamlCharacterConfig};
use ijns::feed::XmlApiFeed;
use ijns::fetcher::Fetcher;
use ijns::notifier::SlackNotifier;
use ijns::snapshot;
use ijns::tracker::JobTracker;
use tokio::{select, signal};
use tracing::{error, info, Level};

use crate::args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logging
    if args.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .init();
    } else {
        tracing_subscriber::fmt().json().init();
    }

    let config = match YamlCharacterConfig::load(&args.characters) {
        Ok(config) => config,
        Err(error) => {
            error!(%error, path = %args.characters.display(), "unusable configuration");
            return ExitCode::from(2);
        },
    };

    if let Err(error) = begin(args, config).await {
        error!(%error, "encountered runtime error");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn begin(args: Args, config: YamlCharacterConfig) -> Result<()> {
    info!(characters = config.characters().count(), "loaded characters");

    let config: Arc<dyn CharacterConfig> = Arc::new(config);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let feed = Arc::new(XmlApiFeed::new(args.api_url, args.key_id, args.vcode));
    let notifier = Arc::new(SlackNotifier::new(args.slack_token));

    // The fetcher and tracker run independently, linked only by the latest
    // snapshot, so a slow fetch never delays a tick.
    let (snapshots_tx, snapshots_rx) = snapshot::channel();
    let fetcher = Fetcher::new(feed, snapshots_tx, clock.clone());
    let tracker = JobTracker::new(config, clock, notifier, snapshots_rx)
        .with_lead_time(TimeDelta::seconds(args.lead_time.into()));

    let mut fetching = tokio::spawn(
        fetcher.run(Duration::from_secs(args.fetch_interval)),
    );
    let mut ticking =
        tokio::spawn(tracker.run(Duration::from_secs(args.tick_interval)));

    info!(
        fetch_interval = args.fetch_interval,
        tick_interval = args.tick_interval,
        lead_time = args.lead_time,
        "running"
    );

    select! {
        x = signal::ctrl_c() => {
            x.context("listening for ctrl-c")?;
            info!("shutting down");
        },
        x = &mut fetching => bail!("fetcher stopped: {:?}", x.err()),
        x = &mut ticking => bail!("tracker stopped: {:?}", x.err()),
    }

    fetching.abort();
    ticking.abort();

    Ok(())
}
