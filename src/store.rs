//! Typed access to the log store: a [`QueryPort`] paired with the
//! [`Normalizer`] that turns its raw hits into entries.

use crate::entry::{EntrySequence, LogEntry};
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::query::{FetchDirection, QueryPort, TimeRange};
use chrono::{DateTime, Utc};
use tracing::debug;

/// One context fetch, with what the store sent before normalization dropped
/// anything.
#[derive(Debug)]
pub struct ContextPage {
    pub entries: EntrySequence,
    /// Raw hits returned; fewer than requested means the stream ends here.
    pub fetched: usize,
    /// Timestamp of the hit furthest from the pivot.
    pub furthest: Option<DateTime<Utc>>,
    /// How many of the fetched hits carry exactly `furthest`.
    pub at_furthest: usize,
}

pub struct LogStore {
    port: Box<dyn QueryPort>,
    normalizer: Normalizer,
}

impl LogStore {
    pub fn new(port: Box<dyn QueryPort>, normalizer: Normalizer) -> Self {
        Self { port, normalizer }
    }

    pub fn context_fields(&self) -> &[String] {
        self.normalizer.context_fields()
    }

    pub fn search(&self, query: &str, range: &TimeRange) -> Result<EntrySequence> {
        let hits = self.port.search(query, range)?;
        let entries = self.normalizer.normalize(hits)?;
        debug!(query, entries = entries.len(), "search");
        Ok(entries)
    }

    /// The entry with this id. Blank lines are returned even when blanks
    /// are filtered from listings.
    pub fn entry_by_id(&self, id: &str) -> Result<LogEntry> {
        let hit = self.port.fetch_by_id(id)?;
        self.normalizer.extract(hit)
    }

    /// Up to `count` entries on one side of `pivot`, pivot included, ascending.
    pub fn context(
        &self,
        pivot: &LogEntry,
        direction: FetchDirection,
        count: usize,
    ) -> Result<EntrySequence> {
        Ok(self.context_page(pivot, direction, count, 0)?.entries)
    }

    /// Like [`context`](LogStore::context), skipping the first `skip` hits.
    pub fn context_page(
        &self,
        pivot: &LogEntry,
        direction: FetchDirection,
        count: usize,
        skip: usize,
    ) -> Result<ContextPage> {
        let mut hits = self
            .port
            .fetch_context_from(pivot, direction.signed(count), skip)?;

        let fetched = hits.len();
        let furthest = match hits.last() {
            Some(hit) => Some(self.normalizer.timestamp_of(hit)?),
            None => None,
        };
        let mut at_furthest = 0;
        for hit in hits.iter().rev() {
            if Some(self.normalizer.timestamp_of(hit)?) != furthest {
                break;
            }
            at_furthest += 1;
        }

        if direction == FetchDirection::Before {
            // Store answers newest-first; flip so equal timestamps keep
            // chronological order through the stable sort.
            hits.reverse();
        }
        let entries = self.normalizer.normalize(hits)?;
        debug!(
            pivot = %pivot.id,
            ?direction,
            requested = count,
            skip,
            fetched,
            received = entries.len(),
            "context fetch"
        );
        Ok(ContextPage {
            entries,
            fetched,
            furthest,
            at_furthest,
        })
    }
}
