//! Log entries and the ordered, duplicate-free sequences built from them.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::ops::Deref;

/// A single log line as returned by the store, after normalization.
///
/// Two entries with the same `id` describe the same log line; the store
/// assigns ids and the rest of the crate deduplicates by them.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Context field name -> value, used to scope context fetches to the
    /// same source/stream as this entry.
    pub context: BTreeMap<String, Value>,
}

impl LogEntry {
    /// Context values in the given field order, rendered as plain strings.
    /// Missing fields render as empty strings.
    pub fn context_values(&self, fields: &[String]) -> Vec<String> {
        fields
            .iter()
            .map(|field| match self.context.get(field) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
            .collect()
    }

    /// Configured context fields this entry does not carry (absent or null).
    pub fn missing_context_fields<'a>(&self, fields: &'a [String]) -> Vec<&'a str> {
        fields
            .iter()
            .filter(|field| matches!(self.context.get(*field), None | Some(Value::Null)))
            .map(String::as_str)
            .collect()
    }
}

/// Ordered (ascending by timestamp) list of entries with unique ids.
///
/// Only the normalizer and the context window build or grow sequences, and
/// both go through the constructors below so the invariants hold everywhere.
#[derive(Debug, Clone, Default)]
pub struct EntrySequence {
    entries: Vec<LogEntry>,
    ids: HashSet<String>,
}

impl EntrySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries in arbitrary order.
    ///
    /// Stable sort by timestamp, so entries sharing a timestamp keep the
    /// order they arrived in. Later duplicates of an id are dropped.
    pub fn from_unsorted(mut entries: Vec<LogEntry>) -> Self {
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self::from_ordered(entries)
    }

    /// Build from entries already in ascending order, dropping repeated ids.
    pub(crate) fn from_ordered(entries: Vec<LogEntry>) -> Self {
        let mut seq = Self::default();
        for entry in entries {
            seq.push_unique(entry);
        }
        seq
    }

    fn push_unique(&mut self, entry: LogEntry) -> bool {
        if self.ids.insert(entry.id.clone()) {
            self.entries.push(entry);
            true
        } else {
            false
        }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        if !self.contains_id(id) {
            return None;
        }
        self.entries.iter().position(|e| e.id == id)
    }

    /// Insert `older` in front. Entries already present are skipped, as are
    /// entries newer than the current first entry. Returns how many were added.
    pub(crate) fn prepend(&mut self, older: Vec<LogEntry>) -> usize {
        let Some(first) = self.entries.first() else {
            let added = Self::from_ordered(older);
            let count = added.len();
            *self = added;
            return count;
        };
        let boundary = first.timestamp;

        let mut fresh = Vec::with_capacity(older.len());
        let mut seen = HashSet::new();
        for entry in older {
            if entry.timestamp > boundary || self.ids.contains(&entry.id) {
                continue;
            }
            if seen.insert(entry.id.clone()) {
                fresh.push(entry);
            }
        }

        let count = fresh.len();
        self.ids.extend(seen);
        fresh.append(&mut self.entries);
        self.entries = fresh;
        count
    }

    /// Push `newer` at the back with the same filtering as [`prepend`].
    ///
    /// [`prepend`]: EntrySequence::prepend
    pub(crate) fn append(&mut self, newer: Vec<LogEntry>) -> usize {
        let boundary = self.entries.last().map(|e| e.timestamp);
        let mut count = 0;
        for entry in newer {
            if boundary.is_some_and(|b| entry.timestamp < b) {
                continue;
            }
            if self.push_unique(entry) {
                count += 1;
            }
        }
        count
    }

    pub fn as_slice(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<LogEntry> {
        self.entries
    }
}

impl Deref for EntrySequence {
    type Target = [LogEntry];

    fn deref(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl IntoIterator for EntrySequence {
    type Item = LogEntry;
    type IntoIter = std::vec::IntoIter<LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a EntrySequence {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
