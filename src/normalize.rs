//! Turns raw store hits into the canonical [`EntrySequence`].
//!
//! Extraction follows the configured field names. A hit with a missing or
//! mistyped timestamp/message fails the whole batch: that almost always means
//! the config does not match the index mapping, and silently skipping lines
//! would hide it.

use crate::entry::{EntrySequence, LogEntry};
use crate::error::{Error, Result};
use crate::query::RawHit;
use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_TIMESTAMP_FIELD: &str = "@timestamp";
pub const DEFAULT_MESSAGE_FIELD: &str = "message";

/// Field mapping and cleanup rules applied to every hit.
#[derive(Debug, Clone)]
pub struct Normalizer {
    timestamp_field: String,
    message_field: String,
    context_fields: Vec<String>,
    cleanup: Option<Regex>,
    ignore_blanks: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            message_field: DEFAULT_MESSAGE_FIELD.to_string(),
            context_fields: Vec::new(),
            cleanup: None,
            ignore_blanks: false,
        }
    }
}

impl Normalizer {
    pub fn new(timestamp_field: impl Into<String>, message_field: impl Into<String>) -> Self {
        Self {
            timestamp_field: timestamp_field.into(),
            message_field: message_field.into(),
            ..Self::default()
        }
    }

    pub fn with_context_fields(mut self, fields: Vec<String>) -> Self {
        self.context_fields = fields;
        self
    }

    pub fn with_cleanup(mut self, cleanup: Option<Regex>) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn with_ignore_blanks(mut self, ignore_blanks: bool) -> Self {
        self.ignore_blanks = ignore_blanks;
        self
    }

    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    pub fn context_fields(&self) -> &[String] {
        &self.context_fields
    }

    /// Normalize a batch of hits into an ascending, duplicate-free sequence.
    pub fn normalize(&self, hits: Vec<RawHit>) -> Result<EntrySequence> {
        let mut entries = Vec::with_capacity(hits.len());
        for hit in hits {
            if let Some(entry) = self.normalize_hit(hit)? {
                entries.push(entry);
            }
        }
        Ok(EntrySequence::from_unsorted(entries))
    }

    /// Normalize one hit. `Ok(None)` means the hit was filtered as blank.
    pub fn normalize_hit(&self, hit: RawHit) -> Result<Option<LogEntry>> {
        let entry = self.extract(hit)?;
        if self.ignore_blanks && entry.message.is_empty() {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    /// Build the entry for one hit without blank filtering.
    ///
    /// Lookups by id use this: a blank line is still a document that exists.
    pub fn extract(&self, hit: RawHit) -> Result<LogEntry> {
        let timestamp = self.timestamp_of(&hit)?;

        let message = match lookup(&hit.source, &self.message_field) {
            Some(Value::String(s)) => self.clean_message(s),
            Some(_) => return Err(malformed(&hit.id, &self.message_field, "is not a string")),
            None => return Err(malformed(&hit.id, &self.message_field, "is missing")),
        };

        let context: BTreeMap<String, Value> = self
            .context_fields
            .iter()
            .filter_map(|field| {
                lookup(&hit.source, field).map(|value| (field.clone(), value.clone()))
            })
            .collect();

        Ok(LogEntry {
            id: hit.id,
            timestamp,
            message,
            context,
        })
    }

    /// Timestamp of a raw hit, with the same rules as full normalization.
    pub fn timestamp_of(&self, hit: &RawHit) -> Result<DateTime<Utc>> {
        match lookup(&hit.source, &self.timestamp_field) {
            Some(value) => parse_timestamp(value)
                .ok_or_else(|| malformed(&hit.id, &self.timestamp_field, "is not a timestamp")),
            None => Err(malformed(&hit.id, &self.timestamp_field, "is missing")),
        }
    }

    /// Strip every match of the cleanup pattern, then trim.
    pub fn clean_message(&self, raw: &str) -> String {
        match &self.cleanup {
            Some(re) => re.replace_all(raw, "").trim().to_string(),
            None => raw.trim().to_string(),
        }
    }
}

fn malformed(id: &str, field: &str, reason: &str) -> Error {
    Error::MalformedEntry {
        id: id.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Find a field in a hit source: the literal key first, then a dotted path
/// through nested objects (`kubernetes.pod.name`).
fn lookup<'a>(source: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    if let Some(value) = source.get(field) {
        return non_null(value);
    }
    let mut parts = field.split('.');
    let mut current = source.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    non_null(current)
}

fn non_null(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

/// RFC 3339 strings (any sub-second precision) or epoch milliseconds.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        _ => None,
    }
}
