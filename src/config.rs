//! Command-line and environment configuration.

use std::path::PathBuf;

use chrono::TimeDelta;
use clap::Parser;

use crate::staleness::STALE_AFTER;

/// A terminal feed for one subreddit.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Subreddit to show.
    #[arg(short, long, default_value = "random")]
    pub topic: String,

    /// OAuth bearer token.  Without one the login screen is shown first.
    #[arg(long, env = "REDDIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Reddit API host.
    #[arg(long, env = "REDDIT_API_URL", default_value = "https://oauth.reddit.com")]
    pub api_url: String,

    /// Posts requested per fetch.
    #[arg(long, default_value_t = 25)]
    pub limit: u32,

    /// User-Agent sent with every request.
    #[arg(long, default_value = concat!("redfeed/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Seconds after which an empty feed is fetched again on login.
    #[arg(
        long,
        default_value_t = STALE_AFTER.num_seconds(),
        value_parser = clap::value_parser!(i64).range(0..=i64::from(u32::MAX))
    )]
    pub stale_after_secs: i64,

    /// UI tick in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub tick_ms: u64,

    /// Directory for the rolling log file.
    #[arg(long, env = "REDFEED_LOG_DIR", default_value = ".")]
    pub log_dir: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub debug: bool,
}

impl Config {
    pub fn stale_after(&self) -> TimeDelta {
        TimeDelta::seconds(self.stale_after_secs)
    }
}
