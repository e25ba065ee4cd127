//! Presentation port: what the navigator hands to whoever draws the screen.

use crate::entry::LogEntry;
use crate::navigator::NavState;
use anyhow::Result;

/// Which kind of buffer is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Search,
    Context,
}

/// Everything needed to draw one frame of the entry list.
#[derive(Debug, Clone, Copy)]
pub struct ListView<'a> {
    pub kind: ViewKind,
    pub title: &'a str,
    /// Entries currently inside the viewport, in display order.
    pub visible: &'a [LogEntry],
    /// Selected row relative to `visible`; `None` when the buffer is empty.
    pub selected: Option<usize>,
    /// Absolute buffer index of `visible[0]`.
    pub first_index: usize,
    /// Total entries in the buffer.
    pub total: usize,
    pub state: &'a NavState,
}

impl ListView<'_> {
    pub fn selected_entry(&self) -> Option<&LogEntry> {
        self.selected.and_then(|idx| self.visible.get(idx))
    }

    /// 1-based absolute position of the selection, for status lines.
    pub fn position(&self) -> usize {
        self.selected.map_or(0, |idx| self.first_index + idx + 1)
    }
}

/// Draws entry lists and transient notices.
pub trait Presenter {
    fn render_list(&mut self, view: &ListView<'_>) -> Result<()>;

    /// Show a short-lived status message (errors, hints).
    fn notify(&mut self, message: &str) -> Result<()>;
}
