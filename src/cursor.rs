//! Cursor manages the relationship between selection and scroll position.
//!
//! Uses vim-like scrolling: selection moves freely within the visible area,
//! and the viewport only scrolls when selection hits the edge padding.
//! Positions are plain buffer indices; when entries are prepended the owner
//! calls [`Cursor::shift`] so the same entries stay selected and on screen.

use std::ops::Range;

/// Rows kept between the selection and the viewport edge (vim's scrolloff).
pub const DEFAULT_EDGE_PADDING: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the selected entry in the buffer
    selected_index: usize,

    /// First visible index
    viewport_origin: usize,

    /// Viewport height in rows (at least 1)
    height: usize,

    /// Padding to keep at edges
    edge_padding: usize,
}

impl Cursor {
    pub fn new(height: usize) -> Self {
        Self {
            selected_index: 0,
            viewport_origin: 0,
            height: height.max(1),
            edge_padding: DEFAULT_EDGE_PADDING,
        }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn viewport_origin(&self) -> usize {
        self.viewport_origin
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Indices currently on screen for a buffer of `len` entries.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.viewport_origin.min(len);
        start..(start + self.height).min(len)
    }

    /// Selection row relative to the top of the viewport
    pub fn screen_offset(&self) -> usize {
        self.selected_index.saturating_sub(self.viewport_origin)
    }

    /// Select an absolute index (clamped to the buffer).
    pub fn select(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.selected_index = 0;
            self.viewport_origin = 0;
            return;
        }
        self.selected_index = index.min(len - 1);
        self.ensure_visible(len);
    }

    /// Move selection by delta, clamping at both ends of the buffer.
    pub fn move_by(&mut self, delta: isize, len: usize) {
        let target = if delta >= 0 {
            self.selected_index.saturating_add(delta.unsigned_abs())
        } else {
            self.selected_index.saturating_sub(delta.unsigned_abs())
        };
        self.select(target, len);
    }

    /// Re-base after `added` entries were inserted in front of the buffer.
    ///
    /// Selection and viewport move by the same amount, so the same entries
    /// remain selected and visible.
    pub fn shift(&mut self, added: usize, len: usize) {
        self.selected_index += added;
        self.viewport_origin += added;
        self.select(self.selected_index, len);
    }

    /// Change the viewport height, keeping the selection on screen.
    pub fn set_height(&mut self, height: usize, len: usize) {
        self.height = height.max(1);
        self.select(self.selected_index, len);
    }

    /// Put the selection in the middle of the viewport.
    pub fn center(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let half_height = self.height / 2;
        self.viewport_origin = self.selected_index.saturating_sub(half_height);
        let max_origin = len.saturating_sub(self.height);
        self.viewport_origin = self.viewport_origin.min(max_origin);
    }

    /// Jump to start (first entry)
    pub fn jump_to_start(&mut self, len: usize) {
        self.viewport_origin = 0;
        self.select(0, len);
    }

    /// Jump to end (last entry), last entry on the bottom row
    pub fn jump_to_end(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.viewport_origin = len.saturating_sub(self.height);
        self.select(len - 1, len);
    }

    /// Only scrolls if selection is outside the padding boundaries.
    fn ensure_visible(&mut self, len: usize) {
        let padding = self.edge_padding.min(self.height / 4);
        let max_origin = len.saturating_sub(self.height);

        // Selection above comfort zone: scroll up
        if self.selected_index < self.viewport_origin + padding {
            self.viewport_origin = self.selected_index.saturating_sub(padding);
        }
        // Selection below comfort zone: scroll down
        else if self.selected_index + padding >= self.viewport_origin + self.height {
            self.viewport_origin = (self.selected_index + padding + 1).saturating_sub(self.height);
        }

        self.viewport_origin = self.viewport_origin.min(max_origin);
    }
}
