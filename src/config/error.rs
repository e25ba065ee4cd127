//! Config error types for lazyctx.
//!
//! Provides rich error messages with file locations and typo suggestions.

use crate::config::types::KNOWN_KEYS;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Error loading or parsing a config file.
#[derive(Debug)]
pub enum ConfigError {
    /// No config file was given or discovered.
    NotFound { searched: Vec<PathBuf> },

    /// IO error reading the config file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error.
    Parse {
        path: PathBuf,
        message: String,
        line: Option<usize>,
        column: Option<usize>,
        suggestion: Option<String>,
    },

    /// Validation error (semantic errors after parsing).
    Validation { path: PathBuf, message: String },
}

impl ConfigError {
    /// Build a parse error from a YAML deserializer message, pulling out the
    /// location and suggesting a known key for unknown-field errors.
    pub fn from_saphyr_error(path: PathBuf, err: impl fmt::Display) -> Self {
        let message = err.to_string();
        let (line, column) = parse_location(&message);
        let suggestion = unknown_field(&message).and_then(suggest_key);
        ConfigError::Parse {
            path,
            message: message.lines().next().unwrap_or_default().to_string(),
            line,
            column,
            suggestion,
        }
    }

    /// Format error in Cargo-style format.
    pub fn format_cargo_style(&self) -> String {
        match self {
            ConfigError::NotFound { searched } => {
                let mut output = String::from("error: no lazyctx config found\n  |\n");
                for path in searched {
                    output.push_str(&format!("  = searched: {}\n", path.display()));
                }
                output.push_str("  = help: run `lazyctx init` or pass --config <PATH>\n");
                output
            }
            ConfigError::Io { path, source } => {
                format!(
                    "error: cannot read config file\n  --> {}\n  |\n  = {}\n",
                    path.display(),
                    source
                )
            }
            ConfigError::Parse {
                path,
                message,
                line,
                column,
                suggestion,
            } => {
                let location = match (line, column) {
                    (Some(l), Some(c)) => format!("{}:{}:{}", path.display(), l, c),
                    (Some(l), None) => format!("{}:{}", path.display(), l),
                    _ => format!("{}", path.display()),
                };
                let mut output = format!("error: {}\n  --> {}\n  |\n", message, location);
                if let Some(suggestion) = suggestion {
                    output.push_str(&format!("  = help: did you mean `{}`?\n", suggestion));
                }
                output
            }
            ConfigError::Validation { path, message } => {
                format!("error: {}\n  --> {}\n  |\n", message, path.display())
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_cargo_style())
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn parse_location(message: &str) -> (Option<usize>, Option<usize>) {
    static LOCATION: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = LOCATION
        .get_or_init(|| Regex::new(r"line (\d+),? column (\d+)").ok())
        .as_ref()
    else {
        return (None, None);
    };
    match re.captures(message) {
        Some(caps) => (
            caps.get(1).and_then(|m| m.as_str().parse().ok()),
            caps.get(2).and_then(|m| m.as_str().parse().ok()),
        ),
        None => (None, None),
    }
}

fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.split("unknown field `").nth(1)?;
    rest.split('`').next()
}

/// Closest known key to `unknown`, if any is similar enough.
fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key.to_string())
}
