//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── target: BackupTarget    # "#channel" or "@user"
//! ├── api: ApiConfig          # token, base URL, HTTP timeout
//! ├── backup: BackupConfig    # destination, date window
//! └── delete: DeleteConfig    # deletion switch, pacing, confirmation
//! ```
//!
//! All options can be provided via CLI arguments or environment variables;
//! the token is usually supplied as `SLACK_API_TOKEN`. Use `--help` to see
//! everything.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};
use jiff::civil;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use slackup_archive::ArchiveLayout;
use slackup_core::WindowBounds;

use crate::target::BackupTarget;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "slackup")]
#[command(about = "Back up (and optionally delete) the contents of a Slack channel or DM, including files")]
#[command(version)]
pub struct Cli {
    /// Conversation to back up: "#name" for a channel, "@name" for a DM
    pub target: BackupTarget,

    /// Slack API connection configuration.
    #[clap(flatten)]
    pub api: slackup_api::ApiConfig,

    /// Archive destination and date window.
    #[clap(flatten)]
    pub backup: BackupConfig,

    /// Deletion behavior.
    #[clap(flatten)]
    pub delete: DeleteConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses
    /// CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is
    /// enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Archive destination and the date window of messages to back up.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Where to store the backup
    #[arg(long = "where", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Only include messages on or after this date (YYYY-MM-DD)
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<civil::Date>,

    /// Only include messages before this date (YYYY-MM-DD)
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<civil::Date>,
}

impl BackupConfig {
    /// Returns the archive destination, defaulting to a timestamped
    /// directory under the working directory.
    pub fn effective_destination(&self) -> PathBuf {
        self.destination
            .clone()
            .unwrap_or_else(|| ArchiveLayout::default_root_name().into())
    }

    /// Maps the date options onto history window bounds (midnight UTC,
    /// epoch seconds).
    pub fn window_bounds(&self) -> Result<WindowBounds, jiff::Error> {
        let mut bounds = WindowBounds::all();
        if let Some(from) = self.from {
            bounds = bounds.with_oldest(epoch_seconds(from)?);
        }
        if let Some(to) = self.to {
            bounds = bounds.with_latest(epoch_seconds(to)?);
        }
        Ok(bounds)
    }
}

/// Deletion switch, confirmation, and rate-limit pacing.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct DeleteConfig {
    /// Delete the backed up messages after archiving
    #[arg(long)]
    pub delete: bool,

    /// Skip the interactive deletion confirmation
    #[arg(long, requires = "delete")]
    pub yes: bool,

    /// Delay between deletion calls in milliseconds (Slack rate limit
    /// Tier 3 allows 50+/min)
    #[arg(long = "delete-delay-ms", value_name = "MS", default_value = "1000")]
    pub delete_delay_ms: u64,
}

impl DeleteConfig {
    /// Returns the inter-call delay as a Duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delete_delay_ms)
    }
}

/// Converts a civil date to its epoch-second string at midnight UTC.
fn epoch_seconds(date: civil::Date) -> Result<String, jiff::Error> {
    let zoned = date.to_zoned(TimeZone::UTC)?;
    Ok(zoned.timestamp().as_second().to_string())
}
