//! Config validate and show commands for lazyctx.
//!
//! Provides config introspection and validation for CI pipelines and developer debugging.

use crate::config::{self, Config};
use colored::Colorize;
use std::path::Path;

fn load(explicit: Option<&Path>) -> Result<Config, i32> {
    config::load_from(explicit, &config::discover()).map_err(|e| {
        eprintln!("{}", e);
        1
    })
}

/// Validate the effective config file.
///
/// Follows Unix conventions:
/// - Exit 0 with no output on success (quiet success)
/// - Exit 1 with error message to stderr on failure
///
/// Validates:
/// - YAML syntax
/// - Known field names (typo detection)
/// - Required keys and regex syntax
/// - Friendly-names CSV existence
pub fn validate(explicit: Option<&Path>) -> Result<(), i32> {
    let cfg = load(explicit)?;

    if let Some(friendly) = &cfg.friendly_names {
        if !friendly.csv.is_file() {
            eprintln!(
                "error: friendly-names csv not found: {}\n  --> {}\n  |",
                friendly.csv.display(),
                cfg.path.display()
            );
            return Err(1);
        }
    }

    Ok(())
}

/// Show the effective configuration with defaults filled in.
///
/// Respects NO_COLOR environment variable via the colored crate.
pub fn show(explicit: Option<&Path>) -> Result<(), i32> {
    let cfg = load(explicit)?;
    println!("Using: {}", cfg.path.display().to_string().dimmed());
    println!();
    for line in describe(&cfg) {
        println!("{}", line);
    }
    Ok(())
}

fn pattern(re: Option<&regex::Regex>) -> String {
    match re {
        Some(re) => re.as_str().green().to_string(),
        None => "(not set)".dimmed().to_string(),
    }
}

/// One `key: value` line per setting.
fn describe(cfg: &Config) -> Vec<String> {
    let key = |name: &str| name.cyan().to_string();
    let mut lines = vec![
        format!("{}: {}", key("elasticsearch-url"), cfg.elasticsearch_url.green()),
        format!("{}: {}", key("index"), cfg.index.green()),
        format!("{}: {}", key("timestamp-field"), cfg.timestamp_field),
        format!("{}: {}", key("message-field"), cfg.message_field),
    ];

    if cfg.context_fields.is_empty() {
        lines.push(format!("{}: {}", key("context-fields"), "(none)".dimmed()));
    } else {
        lines.push(format!("{}:", key("context-fields")));
        for field in &cfg.context_fields {
            lines.push(format!("  - {}", field.yellow()));
        }
    }

    lines.extend([
        format!("{}: {}", key("term-suffix"), cfg.term_suffix),
        format!(
            "{}: {}",
            key("message-cleanup-regex"),
            pattern(cfg.message_cleanup.as_ref())
        ),
        format!("{}: {}", key("ignore-blanks"), cfg.ignore_blanks),
        format!("{}: {}", key("search-size"), cfg.search_size),
        format!("{}: {}", key("page-size"), cfg.navigator.page_size),
        format!("{}: {}", key("context-before"), cfg.navigator.context_before),
        format!("{}: {}", key("context-after"), cfg.navigator.context_after),
        format!(
            "{}: {}",
            key("request-timeout-secs"),
            cfg.request_timeout.as_secs()
        ),
    ]);

    match &cfg.friendly_names {
        Some(friendly) => {
            let status = if friendly.csv.is_file() {
                String::new()
            } else {
                format!(" {}", "(not found)".red())
            };
            lines.push(format!("{}:", key("friendly-names")));
            lines.push(format!(
                "  {}: {}{}",
                "csv".blue(),
                friendly.csv.display().to_string().yellow(),
                status
            ));
            lines.push(format!(
                "  {}: {}",
                "context-cleanup-regex".blue(),
                pattern(friendly.context_cleanup.as_ref())
            ));
        }
        None => lines.push(format!("{}: {}", key("friendly-names"), "(not set)".dimmed())),
    }

    lines
}
