use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::github::{DEFAULT_CONTRIBUTIONS_API, DEFAULT_GITHUB_API};

/// Summarize a GitHub account's public activity.
#[derive(Debug, Clone, Parser)]
#[command(name = "ghsummary", version, about)]
pub struct Config {
    /// GitHub login to summarize
    #[arg(env = "GHSUMMARY_USER")]
    pub user: String,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GHSUMMARY_GITHUB_API", default_value = DEFAULT_GITHUB_API)]
    pub github_api: String,

    /// Base URL of the contributions calendar API
    #[arg(long, env = "GHSUMMARY_CONTRIBUTIONS_API", default_value = DEFAULT_CONTRIBUTIONS_API)]
    pub contributions_api: String,

    /// Day the streak is counted back from (YYYY-MM-DD); defaults to today in UTC
    #[arg(long, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write dark_mode.svg and light_mode.svg into this directory
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,
}

impl Config {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Log level used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Builds the log filter from `RUST_LOG` directives, falling back to
/// [`DEFAULT_LOG_FILTER`].
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
