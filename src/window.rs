//! The context window: a page of the log stream around a pivot entry that
//! grows in either direction on demand.
//!
//! The store's context query is pivot-inclusive, so every extension asks for
//! one entry more than it wants and relies on id-based deduplication to drop
//! the overlap. Extension is all-or-nothing: the fetch happens before any
//! mutation, so a failed fetch leaves the window exactly as it was.
//!
//! A full page that adds nothing (only filtered blanks, or only entries
//! sharing the edge timestamp that are already held) is not the end of the
//! stream; the window pages on past it. Only a short page ends the stream.

use crate::entry::{EntrySequence, LogEntry};
use crate::error::{Error, Result};
use crate::query::FetchDirection;
use crate::store::LogStore;
use tracing::{debug, info, warn};

/// Full pages with nothing new fetched before an extension gives up.
const MAX_BARREN_PAGES: usize = 64;

#[derive(Debug, Clone)]
pub struct ContextWindow {
    pivot: LogEntry,
    entries: EntrySequence,
}

impl ContextWindow {
    /// Open a window on `pivot` with `before` entries strictly preceding it
    /// and `after` entries starting at the pivot itself.
    ///
    /// The pivot ends up in the window exactly once, even if the store leaves
    /// it out of both fetches.
    pub fn seed(store: &LogStore, pivot: &LogEntry, before: usize, after: usize) -> Result<Self> {
        let missing = pivot.missing_context_fields(store.context_fields());
        if !missing.is_empty() {
            return Err(Error::PivotNotFound {
                id: pivot.id.clone(),
                missing: missing.join(", "),
            });
        }

        let preceding = if before > 0 {
            store.context(pivot, FetchDirection::Before, before + 1)?
        } else {
            EntrySequence::new()
        };
        let following = if after > 0 {
            store.context(pivot, FetchDirection::After, after)?
        } else {
            EntrySequence::new()
        };

        let mut ordered: Vec<LogEntry> = preceding
            .into_iter()
            .filter(|e| e.id != pivot.id && e.timestamp <= pivot.timestamp)
            .collect();
        ordered.push(pivot.clone());
        ordered.extend(
            following
                .into_iter()
                .filter(|e| e.id != pivot.id && e.timestamp >= pivot.timestamp),
        );

        let window = Self {
            pivot: pivot.clone(),
            entries: EntrySequence::from_ordered(ordered),
        };
        info!(
            pivot = %pivot.id,
            entries = window.len(),
            pivot_index = window.pivot_index(),
            "context window seeded"
        );
        Ok(window)
    }

    /// Prepend up to `n` entries preceding the current first entry.
    ///
    /// Returns how many were added; `0` means the start of the stream.
    pub fn extend_before(&mut self, store: &LogStore, n: usize) -> Result<usize> {
        self.extend(store, FetchDirection::Before, n)
    }

    /// Append up to `n` entries following the current last entry.
    ///
    /// Returns how many were added; `0` means the end of the stream.
    pub fn extend_after(&mut self, store: &LogStore, n: usize) -> Result<usize> {
        self.extend(store, FetchDirection::After, n)
    }

    fn extend(&mut self, store: &LogStore, direction: FetchDirection, n: usize) -> Result<usize> {
        let edge = match direction {
            FetchDirection::Before => self.entries.first(),
            FetchDirection::After => self.entries.last(),
        };
        let Some(edge) = edge else {
            return Ok(0);
        };
        if n == 0 {
            return Ok(0);
        }

        let page_size = n + 1;
        let mut anchor = edge.clone();
        let mut skip = 0;
        for _ in 0..MAX_BARREN_PAGES {
            let page = store.context_page(&anchor, direction, page_size, skip)?;
            let added = match direction {
                FetchDirection::Before => self.entries.prepend(page.entries.into_vec()),
                FetchDirection::After => self.entries.append(page.entries.into_vec()),
            };
            if added > 0 || page.fetched < page_size {
                debug!(?direction, requested = n, added, total = self.len(), "window extended");
                return Ok(added);
            }

            // Nothing new in a full page: move on past it
            match page.furthest {
                Some(furthest) if furthest != anchor.timestamp => {
                    anchor.timestamp = furthest;
                    skip = page.at_furthest;
                }
                _ => skip += page.fetched,
            }
            debug!(?direction, skip, anchor = %anchor.timestamp, "paging past entries already held");
        }

        warn!(?direction, pages = MAX_BARREN_PAGES, "no new entries found, giving up");
        Ok(0)
    }

    pub fn entries(&self) -> &EntrySequence {
        &self.entries
    }

    pub fn pivot_index(&self) -> usize {
        self.entries.position(&self.pivot.id).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
