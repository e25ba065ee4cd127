//! Config loading for lazyctx.
//!
//! Loads and validates YAML config files with path expansion.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::config::discovery::DiscoveryResult;
use crate::config::error::ConfigError;
use crate::config::types::{
    Config, FriendlyNamesConfig, RawConfig, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCH_SIZE,
    DEFAULT_TERM_SUFFIX,
};
use crate::navigator::NavigatorSettings;
use crate::normalize::{DEFAULT_MESSAGE_FIELD, DEFAULT_TIMESTAMP_FIELD};

/// Expand tilde in path to home directory.
///
/// Handles the following cases:
/// - `~/foo` -> `/home/user/foo`
/// - `/absolute/path` -> unchanged
/// - `relative/path` -> unchanged
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    path.to_path_buf()
}

/// Load and parse a YAML config file.
fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_saphyr::from_str(&content)
        .map_err(|e| ConfigError::from_saphyr_error(path.to_path_buf(), e))
}

/// Load the config an explicit `--config` path points at, or the one
/// discovery found.
pub fn load_from(
    explicit: Option<&Path>,
    discovery: &DiscoveryResult,
) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => load(&expand_path(path)),
        None => match discovery.effective() {
            Some(path) => load(path),
            None => Err(ConfigError::NotFound {
                searched: discovery.searched.clone(),
            }),
        },
    }
}

/// Load, validate and resolve a single config file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let raw = load_file(path)?;
    resolve(raw, path)
}

/// Apply defaults and check the semantic rules a parsed config must satisfy.
pub fn resolve(raw: RawConfig, path: &Path) -> Result<Config, ConfigError> {
    let invalid = |message: String| ConfigError::Validation {
        path: path.to_path_buf(),
        message,
    };

    let elasticsearch_url = required(raw.elasticsearch_url, "elasticsearch-url")
        .map_err(invalid)?
        .trim_end_matches('/')
        .to_string();
    if !elasticsearch_url.starts_with("http://") && !elasticsearch_url.starts_with("https://") {
        return Err(invalid(format!(
            "`elasticsearch-url` must start with http:// or https://, got `{}`",
            elasticsearch_url
        )));
    }
    let index = required(raw.index, "index").map_err(invalid)?;

    let message_cleanup =
        compile(raw.message_cleanup_regex.as_deref(), "message-cleanup-regex").map_err(invalid)?;

    let defaults = NavigatorSettings::default();
    let navigator = NavigatorSettings {
        page_size: raw.page_size.unwrap_or(defaults.page_size),
        context_before: raw.context_before.unwrap_or(defaults.context_before),
        context_after: raw.context_after.unwrap_or(defaults.context_after),
    };
    if navigator.page_size == 0 {
        return Err(invalid("`page-size` must be at least 1".to_string()));
    }
    let search_size = raw.search_size.unwrap_or(DEFAULT_SEARCH_SIZE);
    if search_size == 0 {
        return Err(invalid("`search-size` must be at least 1".to_string()));
    }

    if raw.context_fields.iter().any(|f| f.trim().is_empty()) {
        return Err(invalid("`context-fields` entries must not be empty".to_string()));
    }

    let friendly_names = match raw.friendly_names {
        Some(friendly) => Some(FriendlyNamesConfig {
            csv: expand_path(&friendly.csv),
            context_cleanup: compile(
                friendly.context_cleanup_regex.as_deref(),
                "friendly-names.context-cleanup-regex",
            )
            .map_err(invalid)?,
        }),
        None => None,
    };

    Ok(Config {
        path: path.to_path_buf(),
        elasticsearch_url,
        index,
        timestamp_field: raw
            .timestamp_field
            .unwrap_or_else(|| DEFAULT_TIMESTAMP_FIELD.to_string()),
        message_field: raw
            .message_field
            .unwrap_or_else(|| DEFAULT_MESSAGE_FIELD.to_string()),
        context_fields: raw.context_fields,
        term_suffix: raw
            .term_suffix
            .unwrap_or_else(|| DEFAULT_TERM_SUFFIX.to_string()),
        message_cleanup,
        ignore_blanks: raw.ignore_blanks,
        search_size,
        request_timeout: Duration::from_secs(
            raw.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        navigator,
        friendly_names,
    })
}

fn required(value: Option<String>, key: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("missing required key `{}`", key)),
    }
}

fn compile(pattern: Option<&str>, key: &str) -> Result<Option<Regex>, String> {
    match pattern {
        Some(p) if !p.is_empty() => Regex::new(p)
            .map(Some)
            .map_err(|e| format!("invalid regex in `{}`: {}", key, e)),
        _ => Ok(None),
    }
}
