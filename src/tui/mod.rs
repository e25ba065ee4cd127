mod help;
mod log_view;
mod status_bar;

use crate::friendly::FriendlyNames;
use crate::present::{ListView, Presenter};
use anyhow::Result;
use log_view::Labels;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::time::{Duration, Instant};

/// Status bar rows (2 lines + borders)
pub const STATUS_BAR_HEIGHT: u16 = 4;

/// How long a notice stays in the status bar
pub const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Entry rows available in a terminal of the given height.
pub fn list_height(terminal_height: u16) -> usize {
    // List borders take two rows
    (terminal_height.saturating_sub(STATUS_BAR_HEIGHT + 2) as usize).max(1)
}

/// Draws navigator frames onto a ratatui terminal.
pub struct TerminalPresenter<B: Backend> {
    terminal: Terminal<B>,
    friendly: FriendlyNames,
    context_fields: Vec<String>,
    notice: Option<(String, Instant)>,
    show_help: bool,
}

impl<B: Backend> TerminalPresenter<B> {
    pub fn new(terminal: Terminal<B>, context_fields: Vec<String>, friendly: FriendlyNames) -> Self {
        Self {
            terminal,
            friendly,
            context_fields,
            notice: None,
            show_help: false,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Entry rows available right now.
    pub fn list_height(&self) -> Result<usize> {
        let size = self.terminal.size()?;
        Ok(list_height(size.height))
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    pub fn set_help(&mut self, show: bool) {
        self.show_help = show;
    }

    /// Drop the notice once it has been shown long enough.
    /// Returns true when the screen needs a redraw.
    pub fn expire_notice(&mut self) -> bool {
        match &self.notice {
            Some((_, shown)) if shown.elapsed() >= NOTICE_DURATION => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    fn active_notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|(_, shown)| shown.elapsed() < NOTICE_DURATION)
            .map(|(message, _)| message.as_str())
    }
}

impl<B: Backend> Presenter for TerminalPresenter<B> {
    fn render_list(&mut self, view: &ListView<'_>) -> Result<()> {
        let notice = self.active_notice().map(str::to_string);
        let show_help = self.show_help;
        let labels = Labels {
            friendly: &self.friendly,
            context_fields: &self.context_fields,
        };
        self.terminal
            .draw(|f| draw(f, view, &labels, notice.as_deref(), show_help))?;
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.notice = Some((message.to_string(), Instant::now()));
        Ok(())
    }
}

fn draw(
    f: &mut Frame,
    view: &ListView<'_>,
    labels: &Labels<'_>,
    notice: Option<&str>,
    show_help: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                    // Entry list
            Constraint::Length(STATUS_BAR_HEIGHT), // Status bar
        ])
        .split(f.area());

    log_view::render_log_view(f, chunks[0], view, labels);
    status_bar::render_status_bar(f, chunks[1], view, notice);

    if show_help {
        help::render_help_overlay(f, f.area());
    }
}
