//! Navigator: selection and scrolling over the active buffer.
//!
//! Owns exactly one active view. The search view is parked while a context
//! view is open and comes back with its cursor untouched when the context
//! view closes. Moving past either edge of a context view grows the window by
//! one page and re-bases the cursor so the user's position in the stream is
//! preserved.

use crate::cursor::Cursor;
use crate::entry::{EntrySequence, LogEntry};
use crate::error::Error;
use crate::event::Command;
use crate::present::{ListView, Presenter, ViewKind};
use crate::query::FetchDirection;
use crate::store::LogStore;
use crate::window::ContextWindow;
use anyhow::Result;
use tracing::{debug, warn};

/// Entries fetched per extension when scrolling past a window edge
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Entries loaded on each side of a pivot when a context view opens
pub const DEFAULT_CONTEXT_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorSettings {
    pub page_size: usize,
    pub context_before: usize,
    pub context_after: usize,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            context_before: DEFAULT_CONTEXT_LINES,
            context_after: DEFAULT_CONTEXT_LINES,
        }
    }
}

/// Interaction state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    /// A window extension is in flight
    Extending(FetchDirection),
    /// Last command failed; buffer and cursor are unchanged
    Error(String),
}

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct SearchView {
    title: String,
    entries: EntrySequence,
    cursor: Cursor,
}

#[derive(Debug)]
pub struct ContextView {
    title: String,
    window: ContextWindow,
    cursor: Cursor,
}

#[derive(Debug)]
pub enum ActiveView {
    Search(SearchView),
    Context(ContextView),
}

pub struct Navigator {
    view: ActiveView,
    parked: Option<SearchView>,
    state: NavState,
    settings: NavigatorSettings,
    height: usize,
    context_fields: Vec<String>,
}

impl Navigator {
    /// Start on the search results for `query`, newest entry selected.
    pub fn new(
        query: &str,
        results: EntrySequence,
        height: usize,
        settings: NavigatorSettings,
        context_fields: Vec<String>,
    ) -> Self {
        let mut cursor = Cursor::new(height);
        cursor.jump_to_end(results.len());
        Self {
            view: ActiveView::Search(SearchView {
                title: format!("Search: {query}"),
                entries: results,
                cursor,
            }),
            parked: None,
            state: NavState::Idle,
            settings,
            height: height.max(1),
            context_fields,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn kind(&self) -> ViewKind {
        match self.view {
            ActiveView::Search(_) => ViewKind::Search,
            ActiveView::Context(_) => ViewKind::Context,
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        match &self.view {
            ActiveView::Search(view) => &view.entries,
            ActiveView::Context(view) => view.window.entries(),
        }
    }

    pub fn cursor(&self) -> &Cursor {
        match &self.view {
            ActiveView::Search(view) => &view.cursor,
            ActiveView::Context(view) => &view.cursor,
        }
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        match &mut self.view {
            ActiveView::Search(view) => &mut view.cursor,
            ActiveView::Context(view) => &mut view.cursor,
        }
    }

    pub fn selected(&self) -> Option<&LogEntry> {
        self.entries().get(self.cursor().selected_index())
    }

    fn title(&self) -> &str {
        match &self.view {
            ActiveView::Search(view) => &view.title,
            ActiveView::Context(view) => &view.title,
        }
    }

    /// Apply one command, then redraw.
    ///
    /// Any earlier error is cleared first; only a command that fails again
    /// leaves the navigator in [`NavState::Error`].
    pub fn handle(
        &mut self,
        command: Command,
        store: &LogStore,
        presenter: &mut dyn Presenter,
    ) -> Result<Flow> {
        debug!(?command, "navigator command");
        self.state = NavState::Idle;
        match command {
            Command::MoveBy(delta) => self.move_by(delta, store, presenter)?,
            Command::JumpToStart => {
                let len = self.entries().len();
                self.cursor_mut().jump_to_start(len);
            }
            Command::JumpToEnd => {
                let len = self.entries().len();
                self.cursor_mut().jump_to_end(len);
            }
            Command::OpenContext => self.open_context(store, presenter)?,
            Command::Close => {
                if self.close() == Flow::Quit {
                    return Ok(Flow::Quit);
                }
            }
            Command::Quit => return Ok(Flow::Quit),
            Command::ViewportResized { height, .. } => self.resize(height as usize),
        }
        self.render(presenter)?;
        Ok(Flow::Continue)
    }

    /// Draw the visible slice of the active buffer.
    pub fn render(&self, presenter: &mut dyn Presenter) -> Result<()> {
        let entries = self.entries();
        let cursor = self.cursor();
        let range = cursor.visible_range(entries.len());
        let selected = (!entries.is_empty()).then(|| cursor.screen_offset());
        let view = ListView {
            kind: self.kind(),
            title: self.title(),
            visible: &entries[range.clone()],
            selected,
            first_index: range.start,
            total: entries.len(),
            state: &self.state,
        };
        presenter.render_list(&view)
    }

    fn move_by(
        &mut self,
        delta: isize,
        store: &LogStore,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        let len = self.entries().len();
        if len == 0 || delta == 0 {
            return Ok(());
        }

        let target = self.cursor().selected_index() as isize + delta;
        let direction = if target < 0 {
            Some(FetchDirection::Before)
        } else if target >= len as isize {
            Some(FetchDirection::After)
        } else {
            None
        };

        match (direction, self.kind()) {
            (Some(direction), ViewKind::Context) => {
                self.extend(direction, delta, store, presenter)?;
            }
            _ => self.cursor_mut().move_by(delta, len),
        }
        Ok(())
    }

    /// Grow the context window past an edge, then apply `delta`.
    fn extend(
        &mut self,
        direction: FetchDirection,
        delta: isize,
        store: &LogStore,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        self.state = NavState::Extending(direction);
        self.render(presenter)?;

        let page_size = self.settings.page_size;
        let ActiveView::Context(view) = &mut self.view else {
            return Ok(());
        };

        let result = match direction {
            FetchDirection::Before => view.window.extend_before(store, page_size),
            FetchDirection::After => view.window.extend_after(store, page_size),
        };

        match result {
            Ok(added) => {
                let len = view.window.len();
                if direction == FetchDirection::Before {
                    view.cursor.shift(added, len);
                }
                // At a stream boundary (added == 0) this clamps to the edge
                view.cursor.move_by(delta, len);
                self.state = NavState::Idle;
            }
            Err(err) => {
                warn!(?direction, error = %err, "window extension failed");
                let action = format!("Could not load {} entries", direction.label());
                let message = failure_notice(&action, &err);
                presenter.notify(&message)?;
                self.state = NavState::Error(message);
            }
        }
        Ok(())
    }

    /// Seed a context window on the selected entry.
    ///
    /// From the search view the search is parked; from a context view the
    /// current window is replaced by one centred on the new pivot.
    fn open_context(&mut self, store: &LogStore, presenter: &mut dyn Presenter) -> Result<()> {
        let Some(pivot) = self.selected().cloned() else {
            return Ok(());
        };

        let window = match ContextWindow::seed(
            store,
            &pivot,
            self.settings.context_before,
            self.settings.context_after,
        ) {
            Ok(window) => window,
            Err(err) => {
                warn!(pivot = %pivot.id, error = %err, "cannot open context");
                let message = failure_notice("Cannot open context", &err);
                presenter.notify(&message)?;
                self.state = NavState::Error(message);
                return Ok(());
            }
        };

        let len = window.len();
        let mut cursor = Cursor::new(self.height);
        cursor.select(window.pivot_index(), len);
        cursor.center(len);

        let label = pivot.context_values(&self.context_fields).join(" ");
        let title = if label.trim().is_empty() {
            format!("Context: {}", pivot.id)
        } else {
            format!("Context: {label}")
        };

        let previous = std::mem::replace(
            &mut self.view,
            ActiveView::Context(ContextView {
                title,
                window,
                cursor,
            }),
        );
        if let ActiveView::Search(search) = previous {
            self.parked = Some(search);
        }
        Ok(())
    }

    /// Leave the context view, or signal quit from the search view.
    fn close(&mut self) -> Flow {
        match self.parked.take() {
            Some(search) => {
                self.view = ActiveView::Search(search);
                Flow::Continue
            }
            None => Flow::Quit,
        }
    }

    fn resize(&mut self, height: usize) {
        self.height = height.max(1);
        let len = self.entries().len();
        self.cursor_mut().set_height(height, len);
        if let Some(search) = self.parked.as_mut() {
            search.cursor.set_height(height, search.entries.len());
        }
    }
}

/// Notice text for a failed action. Errors that a retry cannot fix say so.
fn failure_notice(action: &str, err: &Error) -> String {
    if err.is_recoverable() {
        format!("{action}: {err}")
    } else {
        format!("{action}: {err} (retrying will not help)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TimeRange;
    use crate::test_utils::{hit_at, store_with, MockStore, RecordingPresenter};

    const HEIGHT: usize = 10;

    fn settings(page_size: usize, before: usize, after: usize) -> NavigatorSettings {
        NavigatorSettings {
            page_size,
            context_before: before,
            context_after: after,
        }
    }

    fn navigator(store: &LogStore, query: &str, settings: NavigatorSettings) -> Navigator {
        let results = store.search(query, &TimeRange::default()).unwrap();
        Navigator::new(query, results, HEIGHT, settings, vec!["host".into()])
    }

    fn selected_id(nav: &Navigator) -> String {
        nav.selected().unwrap().id.clone()
    }

    fn assert_cursor_invariants(nav: &Navigator) {
        let cursor = nav.cursor();
        assert!(cursor.selected_index() < nav.entries().len());
        assert!(cursor.viewport_origin() <= cursor.selected_index());
        assert!(cursor.selected_index() < cursor.viewport_origin() + cursor.height());
    }

    /// Select the search result with the given id.
    fn select(nav: &mut Navigator, store: &LogStore, presenter: &mut RecordingPresenter, id: &str) {
        let target = nav.entries().iter().position(|e| e.id == id).unwrap() as isize;
        let delta = target - nav.cursor().selected_index() as isize;
        nav.handle(Command::MoveBy(delta), store, presenter).unwrap();
    }

    #[test]
    fn test_search_view_starts_on_newest_entry() {
        let (store, _mock) = store_with(MockStore::stream(0..30));
        let nav = navigator(&store, "*", NavigatorSettings::default());

        assert_eq!(nav.kind(), ViewKind::Search);
        assert_eq!(selected_id(&nav), "e29");
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_search_view_clamps_without_fetching() {
        let (store, mock) = store_with(MockStore::stream(0..30));
        let mut nav = navigator(&store, "*", NavigatorSettings::default());
        let mut presenter = RecordingPresenter::default();

        nav.handle(Command::MoveBy(5), &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e29");

        nav.handle(Command::MoveBy(-100), &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e0");
        assert!(mock.context_calls().is_empty());
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_open_context_scenario() {
        // Search for "error" yields t1, t2, t3; context on t2 with 2 before / 2 after
        let (store, mock) = store_with(MockStore::new(vec![
            hit_at("t0", 0),
            hit_at("t1", 1),
            hit_at("t2", 2),
            hit_at("t3", 3),
            hit_at("t4", 4),
        ]));
        let results = crate::entry::EntrySequence::from_unsorted(vec![
            store.entry_by_id("t1").unwrap(),
            store.entry_by_id("t2").unwrap(),
            store.entry_by_id("t3").unwrap(),
        ]);
        let mut nav = Navigator::new("error", results, HEIGHT, settings(500, 2, 2), vec!["host".into()]);
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "t2");

        mock.script(vec![
            vec![hit_at("t2", 2), hit_at("t1", 1), hit_at("t0", 0)],
            vec![hit_at("t2", 2), hit_at("t3", 3), hit_at("t4", 4)],
        ]);
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        assert_eq!(nav.kind(), ViewKind::Context);
        let ids: Vec<_> = nav.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["t0", "t1", "t2", "t3", "t4"]);
        assert_eq!(selected_id(&nav), "t2");
        let frame = presenter.last().unwrap();
        assert_eq!(frame.selected_id.as_deref(), Some("t2"));
        assert_eq!(frame.kind, ViewKind::Context);
        assert_eq!(frame.title, "Context: web-1");
        assert_eq!((frame.first_index, frame.total), (0, 5));
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_move_up_at_stream_start_stays_without_notice() {
        let (store, mock) = store_with(MockStore::stream(0..30));
        let mut nav = navigator(&store, "*", settings(50, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e0");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        assert_eq!(nav.cursor().selected_index(), 0);

        nav.handle(Command::MoveBy(-1), &store, &mut presenter).unwrap();

        assert_eq!(selected_id(&nav), "e0");
        assert_eq!(nav.cursor().selected_index(), 0);
        assert_eq!(nav.state(), &NavState::Idle);
        assert!(presenter.notices.is_empty());
        // Extension requested a full page, not the move delta
        assert_eq!(*mock.context_calls().last().unwrap(), -51);
    }

    #[test]
    fn test_move_up_past_edge_extends_and_keeps_position() {
        let (store, _mock) = store_with(MockStore::stream(0..1000));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e500");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        // Walk to the first loaded entry (e495)
        nav.handle(Command::MoveBy(-5), &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e495");
        assert_eq!(nav.cursor().selected_index(), 0);

        nav.handle(Command::MoveBy(-1), &store, &mut presenter).unwrap();

        assert_eq!(selected_id(&nav), "e494");
        assert_eq!(nav.cursor().selected_index(), 99);
        assert_eq!(nav.entries().len(), 110);
        assert_eq!(nav.state(), &NavState::Idle);
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_busy_state_rendered_while_extending() {
        let (store, _mock) = store_with(MockStore::stream(0..1000));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e500");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        nav.handle(Command::MoveBy(-5), &store, &mut presenter).unwrap();
        let frames_before = presenter.frames.len();

        nav.handle(Command::MoveBy(-1), &store, &mut presenter).unwrap();

        let frames = &presenter.frames[frames_before..];
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].state, NavState::Extending(FetchDirection::Before));
        assert_eq!(frames[1].state, NavState::Idle);
    }

    #[test]
    fn test_move_down_past_edge_extends_after() {
        let (store, _mock) = store_with(MockStore::stream(0..1000));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e500");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        // Window is e495..=e504, pivot at index 5
        assert_eq!(nav.entries().len(), 10);

        nav.handle(Command::MoveBy(7), &store, &mut presenter).unwrap();

        assert_eq!(selected_id(&nav), "e507");
        assert_eq!(nav.entries().len(), 110);
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_move_down_at_stream_end_clamps() {
        let (store, _mock) = store_with(MockStore::stream(0..20));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e19");

        nav.handle(Command::MoveBy(3), &store, &mut presenter).unwrap();

        assert_eq!(selected_id(&nav), "e19");
        assert_eq!(nav.state(), &NavState::Idle);
        assert!(presenter.notices.is_empty());
    }

    #[test]
    fn test_large_jump_past_edge_clamps_to_new_start() {
        let (store, _mock) = store_with(MockStore::stream(0..1000));
        let mut nav = navigator(&store, "*", settings(20, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e500");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        // 5 above the top of the window plus more than a page
        nav.handle(Command::MoveBy(-40), &store, &mut presenter).unwrap();

        assert_eq!(nav.cursor().selected_index(), 0);
        assert_eq!(selected_id(&nav), "e475");
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_fetch_failure_keeps_state_and_notifies() {
        let (store, mock) = store_with(MockStore::stream(0..1000));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e500");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        nav.handle(Command::MoveBy(-5), &store, &mut presenter).unwrap();
        let cursor_before = *nav.cursor();
        let len_before = nav.entries().len();

        mock.fail_next("timeout");
        let flow = nav.handle(Command::MoveBy(-1), &store, &mut presenter).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(matches!(nav.state(), NavState::Error(_)));
        assert_eq!(*nav.cursor(), cursor_before);
        assert_eq!(nav.entries().len(), len_before);
        assert_eq!(presenter.notices.len(), 1);
        assert!(presenter.notices[0].contains("timeout"));
        assert!(!presenter.notices[0].contains("retrying will not help"));

        // Retrying the same move succeeds and returns to idle
        nav.handle(Command::MoveBy(-1), &store, &mut presenter).unwrap();
        assert_eq!(nav.state(), &NavState::Idle);
        assert_eq!(selected_id(&nav), "e494");
    }

    #[test]
    fn test_successful_commands_clear_error() {
        let (store, mock) = store_with(MockStore::stream(0..1000));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e500");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        nav.handle(Command::MoveBy(-5), &store, &mut presenter).unwrap();
        let resize = Command::ViewportResized {
            width: 80,
            height: 8,
        };

        for command in [Command::JumpToEnd, Command::JumpToStart, resize, Command::MoveBy(0)] {
            // Fail an extension from the top of the window
            nav.handle(Command::JumpToStart, &store, &mut presenter).unwrap();
            mock.fail_next("timeout");
            nav.handle(Command::MoveBy(-1), &store, &mut presenter).unwrap();
            assert!(matches!(nav.state(), NavState::Error(_)));

            nav.handle(command, &store, &mut presenter).unwrap();

            assert_eq!(nav.state(), &NavState::Idle, "after {command:?}");
            assert_eq!(presenter.last().unwrap().state, NavState::Idle);
        }
    }

    #[test]
    fn test_error_on_empty_buffer_cleared_by_next_command() {
        let (store, _mock) = store_with(MockStore::stream(0..5));
        let mut nav = Navigator::new(
            "nothing",
            EntrySequence::new(),
            HEIGHT,
            NavigatorSettings::default(),
            vec!["host".into()],
        );
        let mut presenter = RecordingPresenter::default();
        nav.state = NavState::Error("earlier failure".into());

        nav.handle(Command::MoveBy(1), &store, &mut presenter).unwrap();

        assert_eq!(nav.state(), &NavState::Idle);
    }

    #[test]
    fn test_malformed_context_says_retry_will_not_help() {
        let (store, mock) = store_with(MockStore::stream(0..30));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        mock.script(vec![vec![crate::query::RawHit::new(
            "broken",
            serde_json::json!({"message": "no timestamp", "host": "web-1"}),
        )]]);

        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        assert_eq!(nav.kind(), ViewKind::Search);
        assert!(matches!(nav.state(), NavState::Error(_)));
        assert!(presenter.notices[0].contains("malformed entry 'broken'"));
        assert!(presenter.notices[0].ends_with("(retrying will not help)"));
    }

    #[test]
    fn test_open_context_without_context_fields_notifies() {
        let (store, _mock) = store_with(MockStore::new(vec![crate::query::RawHit::new(
            "orphan",
            serde_json::json!({"@timestamp": "2024-01-01T00:00:00Z", "message": "no host"}),
        )]));
        let mut nav = navigator(&store, "*", NavigatorSettings::default());
        let mut presenter = RecordingPresenter::default();

        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        assert_eq!(nav.kind(), ViewKind::Search);
        assert!(matches!(nav.state(), NavState::Error(_)));
        assert_eq!(presenter.notices.len(), 1);
    }

    #[test]
    fn test_close_restores_search_cursor() {
        let (store, _mock) = store_with(MockStore::stream(0..50));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e20");
        let search_cursor = *nav.cursor();

        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        nav.handle(Command::MoveBy(3), &store, &mut presenter).unwrap();
        let flow = nav.handle(Command::Close, &store, &mut presenter).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(nav.kind(), ViewKind::Search);
        assert_eq!(*nav.cursor(), search_cursor);
        assert_eq!(selected_id(&nav), "e20");
    }

    #[test]
    fn test_jumps_stay_inside_loaded_window() {
        let (store, mock) = store_with(MockStore::stream(0..100));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e50");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        let calls = mock.context_calls().len();

        nav.handle(Command::JumpToStart, &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e45");
        nav.handle(Command::JumpToEnd, &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e54");

        assert_eq!(mock.context_calls().len(), calls);
        assert_cursor_invariants(&nav);
    }

    #[test]
    fn test_close_from_search_quits() {
        let (store, _mock) = store_with(MockStore::stream(0..5));
        let mut nav = navigator(&store, "*", NavigatorSettings::default());
        let mut presenter = RecordingPresenter::default();

        let flow = nav.handle(Command::Close, &store, &mut presenter).unwrap();
        assert_eq!(flow, Flow::Quit);
        assert_eq!(
            nav.handle(Command::Quit, &store, &mut presenter).unwrap(),
            Flow::Quit
        );
    }

    #[test]
    fn test_reopen_context_from_context_view() {
        let (store, _mock) = store_with(MockStore::stream(0..100));
        let mut nav = navigator(&store, "*", settings(100, 5, 5));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e50");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();
        nav.handle(Command::MoveBy(2), &store, &mut presenter).unwrap();

        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        assert_eq!(selected_id(&nav), "e52");
        assert_eq!(nav.entries()[5].id, "e52");
        // Closing still returns to the search results
        nav.handle(Command::Close, &store, &mut presenter).unwrap();
        assert_eq!(selected_id(&nav), "e50");
    }

    #[test]
    fn test_resize_keeps_selection_visible() {
        let (store, _mock) = store_with(MockStore::stream(0..100));
        let mut nav = navigator(&store, "*", settings(100, 20, 20));
        let mut presenter = RecordingPresenter::default();
        select(&mut nav, &store, &mut presenter, "e50");
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        nav.handle(
            Command::ViewportResized {
                width: 80,
                height: 3,
            },
            &store,
            &mut presenter,
        )
        .unwrap();

        assert_eq!(nav.cursor().height(), 3);
        assert_eq!(selected_id(&nav), "e50");
        assert_cursor_invariants(&nav);
        let frame = presenter.last().unwrap();
        assert!(frame.visible_ids.len() <= 3);
        assert!(frame.visible_ids.contains(&"e50".to_string()));
    }

    #[test]
    fn test_empty_search_ignores_commands() {
        let (store, _mock) = store_with(MockStore::stream(0..5));
        let mut nav = navigator(&store, "no-such-text", NavigatorSettings::default());
        let mut presenter = RecordingPresenter::default();

        nav.handle(Command::MoveBy(1), &store, &mut presenter).unwrap();
        nav.handle(Command::OpenContext, &store, &mut presenter).unwrap();

        assert!(nav.selected().is_none());
        assert_eq!(nav.kind(), ViewKind::Search);
        assert_eq!(presenter.last().unwrap().selected_id, None);
    }
}
