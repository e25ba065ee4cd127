//! Config types for lazyctx.
//!
//! Defines structures for parsing and representing configuration files.

use crate::navigator::NavigatorSettings;
use crate::normalize::Normalizer;
use crate::query::elasticsearch::ElasticsearchSettings;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Key names accepted at the top level, used for typo suggestions.
pub const KNOWN_KEYS: &[&str] = &[
    "elasticsearch-url",
    "index",
    "timestamp-field",
    "message-field",
    "context-fields",
    "term-suffix",
    "message-cleanup-regex",
    "ignore-blanks",
    "search-size",
    "page-size",
    "context-before",
    "context-after",
    "request-timeout-secs",
    "friendly-names",
    "csv",
    "context-cleanup-regex",
];

pub const DEFAULT_TERM_SUFFIX: &str = ".raw";
pub const DEFAULT_SEARCH_SIZE: usize = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Raw config file structure (used for parsing).
///
/// This struct directly mirrors the YAML config file structure.
/// Unknown fields are rejected with an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RawConfig {
    pub elasticsearch_url: Option<String>,
    pub index: Option<String>,
    pub timestamp_field: Option<String>,
    pub message_field: Option<String>,
    /// Fields that scope a context view to the pivot's stream (host, program...).
    #[serde(default)]
    pub context_fields: Vec<String>,
    pub term_suffix: Option<String>,
    pub message_cleanup_regex: Option<String>,
    #[serde(default)]
    pub ignore_blanks: bool,
    pub search_size: Option<usize>,
    pub page_size: Option<usize>,
    pub context_before: Option<usize>,
    pub context_after: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub friendly_names: Option<RawFriendlyNames>,
}

/// Raw friendly-name table settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RawFriendlyNames {
    /// CSV file with `name,key` lines (may contain tilde).
    pub csv: PathBuf,
    pub context_cleanup_regex: Option<String>,
}

/// Validated friendly-name settings with the path expanded.
#[derive(Debug, Clone)]
pub struct FriendlyNamesConfig {
    pub csv: PathBuf,
    pub context_cleanup: Option<Regex>,
}

/// Validated configuration with defaults applied and patterns compiled.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the config was loaded from.
    pub path: PathBuf,
    pub elasticsearch_url: String,
    pub index: String,
    pub timestamp_field: String,
    pub message_field: String,
    pub context_fields: Vec<String>,
    pub term_suffix: String,
    pub message_cleanup: Option<Regex>,
    pub ignore_blanks: bool,
    pub search_size: usize,
    pub request_timeout: Duration,
    pub navigator: NavigatorSettings,
    pub friendly_names: Option<FriendlyNamesConfig>,
}

impl Config {
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(&self.timestamp_field, &self.message_field)
            .with_context_fields(self.context_fields.clone())
            .with_cleanup(self.message_cleanup.clone())
            .with_ignore_blanks(self.ignore_blanks)
    }

    pub fn elasticsearch_settings(&self) -> ElasticsearchSettings {
        ElasticsearchSettings {
            url: self.elasticsearch_url.clone(),
            index: self.index.clone(),
            timestamp_field: self.timestamp_field.clone(),
            context_fields: self.context_fields.clone(),
            term_suffix: self.term_suffix.clone(),
            search_size: self.search_size,
            timeout: self.request_timeout,
        }
    }
}
