//! Non-interactive `search` and `show-context` commands.
//!
//! Both print plain text to stdout so they compose with grep and less.

use crate::entry::LogEntry;
use crate::friendly::FriendlyNames;
use crate::store::LogStore;
use crate::window::ContextWindow;
use anyhow::Result;
use chrono::SecondsFormat;
use colored::Colorize;
use std::io::Write;
use unicode_width::UnicodeWidthStr;

/// Width of the timestamp column in `show-context` output
const TIMESTAMP_COLUMN: usize = 30;

fn timestamp(entry: &LogEntry) -> String {
    entry.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Aligned rows of `id  timestamp  label  message`, oldest first.
pub fn format_search_rows(
    entries: &[LogEntry],
    friendly: &FriendlyNames,
    context_fields: &[String],
) -> Vec<String> {
    let rows: Vec<[String; 4]> = entries
        .iter()
        .map(|e| {
            [
                e.id.clone(),
                timestamp(e),
                friendly.label(e, context_fields),
                e.message.clone(),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
    }

    rows.into_iter()
        .map(|[id, ts, label, message]| {
            let mut line = String::new();
            for (cell, width) in [id, ts, label].iter().zip(widths) {
                line.push_str(cell);
                line.push_str(&" ".repeat(width - cell.width() + 1));
            }
            line.push_str(&message);
            line
        })
        .collect()
}

pub fn search(
    out: &mut dyn Write,
    store: &LogStore,
    friendly: &FriendlyNames,
    query: &str,
    range: &crate::query::TimeRange,
) -> Result<()> {
    let entries = store.search(query, range)?;
    for row in format_search_rows(&entries, friendly, store.context_fields()) {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

/// Print the window around entry `id`; the pivot row is highlighted.
pub fn show_context(
    out: &mut dyn Write,
    store: &LogStore,
    id: &str,
    before: usize,
    after: usize,
) -> Result<()> {
    let pivot = store.entry_by_id(id)?;
    let window = ContextWindow::seed(store, &pivot, before, after)?;
    for (i, entry) in window.entries().iter().enumerate() {
        let line = format!(
            "{:<width$} {}",
            timestamp(entry),
            entry.message,
            width = TIMESTAMP_COLUMN
        );
        if i == window.pivot_index() {
            writeln!(out, "{}", line.bold())?;
        } else {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
