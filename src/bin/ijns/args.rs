use std::path::PathBuf;

use clap::Parser;
use ijns::feed::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub(crate) struct Args {
    /// API key ID with access to the corporation's industry jobs.
    #[arg(short, long, env = "IJNS_KEYID")]
    pub(crate) key_id: String,
    /// API verification code.
    #[arg(short, long, env = "IJNS_VCODE", hide_env_values = true)]
    pub(crate) vcode: String,
    /// Slack bot token used to send alerts.
    #[arg(short, long, env = "IJNS_SLACK_TOKEN", hide_env_values = true)]
    pub(crate) slack_token: String,
    /// YAML file mapping Slack usernames to the characters to alert them
    /// about.
    #[arg(short, long, env = "IJNS_CHARACTERS")]
    pub(crate) characters: PathBuf,
    /// Industry jobs endpoint.
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub(crate) api_url: String,
    /// Seconds between fetches of the job list.
    #[arg(short, long, default_value_t = 900)]
    pub(crate) fetch_interval: u64,
    /// Seconds between checks for jobs to alert about.
    #[arg(short, long, default_value_t = 1)]
    pub(crate) tick_interval: u64,
    /// Seconds before a job completes to alert about it.
    #[arg(short, long, default_value_t = 60)]
    pub(crate) lead_time: u32,
    /// Enables human-friendly logging.
    #[arg(short, long, default_value_t)]
    pub(crate) debug: bool,
}
