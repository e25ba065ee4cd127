//! Friendly display names for context keys.
//!
//! A CSV of `name,key` lines maps the pivot's context values joined with `:`
//! (e.g. `web-1:nginx`) to a human name.

use crate::config::FriendlyNamesConfig;
use crate::entry::LogEntry;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FriendlyNames {
    names: HashMap<String, String>,
    cleanup: Option<Regex>,
}

impl FriendlyNames {
    pub fn load(config: &FriendlyNamesConfig) -> Result<Self> {
        let content = fs::read_to_string(&config.csv)
            .with_context(|| format!("Failed to read friendly names: {}", config.csv.display()))?;
        let names = Self::parse(&content, config.context_cleanup.clone());
        debug!(path = %config.csv.display(), names = names.len(), "loaded friendly names");
        Ok(names)
    }

    pub fn parse(content: &str, cleanup: Option<Regex>) -> Self {
        let names = content
            .lines()
            .filter_map(|line| {
                let (name, key) = line.split_once(',')?;
                Some((key.to_string(), name.to_string()))
            })
            .collect();
        Self { names, cleanup }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for a joined context key, after cleanup.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        let key = match &self.cleanup {
            Some(re) => re.replace_all(key, "").into_owned(),
            None => key.to_string(),
        };
        self.names.get(&key).map(String::as_str)
    }

    /// Friendly name for the entry, or its context values separated by spaces.
    pub fn label(&self, entry: &LogEntry, fields: &[String]) -> String {
        let values = entry.context_values(fields);
        match self.lookup(&values.join(":")) {
            Some(name) => name.to_string(),
            None => values.join(" "),
        }
    }
}
