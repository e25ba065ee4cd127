use crate::navigator::NavState;
use crate::present::{ListView, ViewKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn status_text(view: &ListView<'_>) -> String {
    let mode = match view.kind {
        ViewKind::Search => "Search",
        ViewKind::Context => "Context",
    };
    let state = match view.state {
        NavState::Idle => String::new(),
        NavState::Extending(direction) => format!(" | Loading {} entries...", direction.label()),
        NavState::Error(_) => " | Error".to_string(),
    };
    format!(
        " Entry {}/{} | Mode: {}{}",
        view.position(),
        view.total,
        mode,
        state
    )
}

fn help_text(kind: ViewKind) -> &'static str {
    match kind {
        ViewKind::Search => " q - Quit | j/k - Navigate | Enter - Context | ? - Help",
        ViewKind::Context => " q - Back | j/k - Navigate (loads more at edges) | J/K - ±20 | ? - Help",
    }
}

pub(super) fn render_status_bar(f: &mut Frame, area: Rect, view: &ListView<'_>, notice: Option<&str>) {
    let bottom_line = match notice {
        Some(message) => {
            let color = if matches!(view.state, NavState::Error(_)) {
                Color::Red
            } else {
                Color::Green
            };
            Line::from(vec![Span::styled(
                format!(" {}", message),
                Style::default().fg(color),
            )])
        }
        None => Line::from(vec![Span::styled(
            help_text(view.kind),
            Style::default().fg(Color::DarkGray),
        )]),
    };

    let status_style = match view.state {
        NavState::Extending(_) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    };

    let status_lines = vec![
        Line::from(vec![Span::styled(status_text(view), status_style)]),
        bottom_line,
    ];

    let paragraph =
        Paragraph::new(status_lines).block(Block::default().borders(Borders::ALL).title("Status"));

    f.render_widget(paragraph, area);
}
