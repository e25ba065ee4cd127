//! CLI subcommand infrastructure for lazyctx.
//!
//! Provides subcommand definitions for searching, context display, the
//! interactive navigator and config management.

pub mod config;
pub mod init;
pub mod search;

use crate::query::TimeRange;
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Subcommand};

/// Available subcommands for lazyctx.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for entries matching a query string
    Search(SearchArgs),

    /// Print the entries surrounding one entry of its stream
    ShowContext(ShowContextArgs),

    /// Browse search results and their context interactively
    Tui(SearchArgs),

    /// Initialize a new lazyctx.yaml config file
    Init(InitArgs),

    /// Config file commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments shared by `search` and `tui`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query string (Lucene syntax, `*` for everything)
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Only entries at or after this time (RFC 3339 or relative: 30s, 15m, 2h, 7d)
    #[arg(long, value_parser = parse_time_arg)]
    pub since: Option<DateTime<Utc>>,

    /// Only entries at or before this time (RFC 3339 or relative)
    #[arg(long, value_parser = parse_time_arg)]
    pub until: Option<DateTime<Utc>>,
}

impl SearchArgs {
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            from: self.since,
            to: self.until,
        }
    }
}

/// Arguments for the show-context subcommand.
#[derive(Args, Debug)]
pub struct ShowContextArgs {
    /// Id of the pivot entry
    #[arg(value_name = "ID")]
    pub id: String,

    /// Entries to print before the pivot [default: context-before from config]
    #[arg(short = 'B', long = "before-context", value_name = "N")]
    pub before: Option<usize>,

    /// Entries to print from the pivot on [default: context-after from config]
    #[arg(short = 'A', long = "after-context", value_name = "N")]
    pub after: Option<usize>,
}

/// Arguments for the init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

/// Config subcommand actions.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the config file
    Validate,
    /// Show effective configuration
    Show,
}

fn parse_time_arg(value: &str) -> Result<DateTime<Utc>, String> {
    parse_time_at(value, Utc::now())
}

/// Parse an absolute RFC 3339 time, or a duration suffixed with s/m/h/d
/// meaning that long before `now`.
pub fn parse_time_at(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.with_timezone(&Utc));
    }

    let invalid = || {
        format!(
            "invalid time `{}`: expected RFC 3339 (2024-01-31T12:00:00Z) or a duration like 15m",
            value
        )
    };
    let unit = value.chars().last().ok_or_else(invalid)?;
    let amount: i64 = value[..value.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    let ago = match unit {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;
    now.checked_sub_signed(ago).ok_or_else(invalid)
}
