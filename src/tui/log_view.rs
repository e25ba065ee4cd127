use crate::entry::LogEntry;
use crate::friendly::FriendlyNames;
use crate::present::{ListView, ViewKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// Row rendering constants
const SELECTED_BG: Color = Color::DarkGray;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const MAX_LABEL_WIDTH: usize = 24;
const TAB_SIZE: usize = 4;

/// How entries are labelled in the search list.
pub(super) struct Labels<'a> {
    pub friendly: &'a FriendlyNames,
    pub context_fields: &'a [String],
}

impl Labels<'_> {
    fn label(&self, entry: &LogEntry) -> String {
        self.friendly.label(entry, self.context_fields)
    }
}

/// Apply selection styling to a span (dark bg, bold, lift dark foregrounds)
fn apply_selection_style(style: Style) -> Style {
    let adjusted = match style.fg {
        Some(Color::Gray) | Some(Color::DarkGray) | Some(Color::Black) => style.fg(Color::White),
        _ => style,
    };
    adjusted.bg(SELECTED_BG).add_modifier(Modifier::BOLD)
}

/// Expand tabs to spaces for proper rendering
fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len());
    let mut column = 0;

    for ch in line.chars() {
        if ch == '\t' {
            let spaces = TAB_SIZE - (column % TAB_SIZE);
            result.extend(std::iter::repeat(' ').take(spaces));
            column += spaces;
        } else {
            result.push(ch);
            column += ch.width().unwrap_or(0);
        }
    }

    result
}

/// Cut `text` to at most `width` display columns, never splitting a wide char.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut result = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        result.push(ch);
    }
    result
}

/// Truncate and right-pad to exactly `width` columns.
fn fit_to_width(text: &str, width: usize) -> String {
    let mut fitted = truncate_to_width(text, width);
    let pad = width.saturating_sub(fitted.width());
    fitted.extend(std::iter::repeat(' ').take(pad));
    fitted
}

/// One list row: timestamp, optional label column, message (first line only).
fn entry_line(
    entry: &LogEntry,
    label: Option<(&str, usize)>,
    width: usize,
    selected: bool,
) -> Line<'static> {
    let timestamp = entry.timestamp.format(TIMESTAMP_FORMAT).to_string();
    let mut spans = vec![Span::styled(
        truncate_to_width(&timestamp, width),
        Style::default().fg(Color::Cyan),
    )];
    let mut used = timestamp.width().min(width);

    if let Some((label, label_width)) = label {
        if used < width {
            let column = format!(" {}", fit_to_width(label, label_width));
            let column = truncate_to_width(&column, width - used);
            used += column.width();
            spans.push(Span::styled(column, Style::default().fg(Color::Yellow)));
        }
    }

    if used < width {
        let first_line = entry.message.lines().next().unwrap_or_default();
        let message = format!(" {}", expand_tabs(first_line));
        let message = truncate_to_width(&message, width - used);
        used += message.width();
        spans.push(Span::raw(message));
    }

    if selected {
        // Fill the rest of the row so the highlight spans the full width
        spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
        for span in spans.iter_mut() {
            span.style = apply_selection_style(span.style);
        }
    }

    Line::from(spans)
}

pub(super) fn render_log_view(f: &mut Frame, area: Rect, view: &ListView<'_>, labels: &Labels<'_>) {
    let available_width = area.width.saturating_sub(2) as usize; // Account for borders

    let show_labels = view.kind == ViewKind::Search && !labels.context_fields.is_empty();
    let row_labels: Vec<String> = if show_labels {
        view.visible.iter().map(|e| labels.label(e)).collect()
    } else {
        Vec::new()
    };
    let label_width = row_labels
        .iter()
        .map(|l| l.width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    let items: Vec<ListItem> = view
        .visible
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let label = row_labels.get(i).map(|l| (l.as_str(), label_width));
            let selected = view.selected == Some(i);
            ListItem::new(entry_line(entry, label, available_width, selected))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", view.title));

    if items.is_empty() {
        let empty = List::new(vec![ListItem::new(Line::from(Span::styled(
            " No matching entries",
            Style::default().fg(Color::DarkGray),
        )))])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    f.render_widget(List::new(items).block(block), area);
}
