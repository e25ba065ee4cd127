pub mod elasticsearch;

use crate::entry::LogEntry;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// One document as returned by the store, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl RawHit {
    /// Build a hit from a JSON value; anything but an object yields an empty source.
    pub fn new(id: impl Into<String>, source: Value) -> Self {
        let source = match source {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            source,
        }
    }
}

/// Optional bounds on the timestamp of search results (both inclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Which way a context fetch walks from its pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    /// Entries at or before the pivot.
    Before,
    /// Entries at or after the pivot.
    After,
}

impl FetchDirection {
    /// Signed count for [`QueryPort::fetch_context`]: negative walks backwards.
    pub fn signed(self, count: usize) -> i64 {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        match self {
            FetchDirection::Before => -count,
            FetchDirection::After => count,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FetchDirection::Before => "earlier",
            FetchDirection::After => "later",
        }
    }
}

/// Narrow contract the navigator needs from a log store.
///
/// Implementations may block; every call is made from the single interaction
/// thread and nothing else runs while it is outstanding.
pub trait QueryPort {
    /// Free-form query, optionally restricted to a time range.
    fn search(&self, query: &str, range: &TimeRange) -> Result<Vec<RawHit>>;

    /// Single document by id. Fails with `Error::NotFound` when absent.
    fn fetch_by_id(&self, id: &str) -> Result<RawHit>;

    /// Contiguous run of entries sharing the pivot's context.
    ///
    /// `count > 0`: up to `count` entries at/after the pivot, ascending.
    /// `count < 0`: up to `|count|` entries at/before the pivot, descending.
    /// The pivot itself is part of the result in both directions.
    fn fetch_context(&self, pivot: &LogEntry, count: i64) -> Result<Vec<RawHit>> {
        self.fetch_context_from(pivot, count, 0)
    }

    /// Like [`fetch_context`](QueryPort::fetch_context), but leaves out the
    /// first `skip` hits of the same ordering. Used to page through runs the
    /// caller cannot make progress on (blank lines, many equal timestamps).
    fn fetch_context_from(&self, pivot: &LogEntry, count: i64, skip: usize)
        -> Result<Vec<RawHit>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signed_count() {
        assert_eq!(FetchDirection::Before.signed(500), -500);
        assert_eq!(FetchDirection::After.signed(500), 500);
    }

    #[test]
    fn test_raw_hit_deserializes_store_shape() {
        let hit: RawHit =
            serde_json::from_value(json!({"_id": "x1", "_index": "logs", "_source": {"message": "m"}}))
                .unwrap();
        assert_eq!(hit.id, "x1");
        assert_eq!(hit.source.get("message"), Some(&json!("m")));
    }

    #[test]
    fn test_raw_hit_new_ignores_non_objects() {
        assert!(RawHit::new("a", json!("text")).source.is_empty());
    }
}
