use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

// Help overlay dimensions (as percentage of screen)
const HELP_POPUP_WIDTH_PERCENT: f32 = 0.6;
const HELP_POPUP_HEIGHT_PERCENT: f32 = 0.8;

const POPUP_BG: Color = Color::Rgb(25, 25, 35);

fn heading(text: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(vec![Span::styled(
            "lazyctx - Quick Reference",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        heading("Navigation"),
        Line::from("  j/k, ↑/↓      Move selection by one entry"),
        Line::from("  J / K         Move by 20 entries"),
        Line::from("  PageUp/Down   Move by one screen"),
        Line::from("  g / G         First / last loaded entry"),
        Line::from(""),
        heading("Context"),
        Line::from("  Enter         Open context around the selected entry"),
        Line::from("  q / Esc       Back to search results"),
        Line::from("  (edges)       Moving past the first or last entry"),
        Line::from("                loads more of the surrounding log"),
        Line::from(""),
        Line::from("  q / Esc       Quit (from search results)"),
        Line::from("  Ctrl+C        Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ]
}

pub(super) fn render_help_overlay(f: &mut Frame, area: Rect) {
    let popup_width = (area.width as f32 * HELP_POPUP_WIDTH_PERCENT) as u16;
    let popup_height = (area.height as f32 * HELP_POPUP_HEIGHT_PERCENT) as u16;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect {
        x: area.x + popup_x,
        y: area.y + popup_y,
        width: popup_width,
        height: popup_height,
    };

    let help_paragraph = Paragraph::new(help_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().bg(POPUP_BG)),
        )
        .style(Style::default().bg(POPUP_BG).fg(Color::White));

    // Clear the area first to remove background content
    f.render_widget(Clear, popup_area);
    f.render_widget(help_paragraph, popup_area);
}
