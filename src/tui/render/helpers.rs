use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::io::store::Storage;
use crate::model::task::{Status, Task};
use crate::tui::app::{App, Prompt};
use crate::util::unicode;

/// Checkbox for each lane, markdown style
pub(super) fn status_symbol(status: Status) -> String {
    format!("[{}]", status.checkbox_char())
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Truncate spans to fit within `max_width` cells.
pub(super) fn truncate_spans(spans: &mut Vec<Span<'static>>, max_width: usize) {
    let mut total = 0usize;
    let mut truncate_at = spans.len();

    for (i, span) in spans.iter().enumerate() {
        let span_width = unicode::display_width(&span.content);
        if total + span_width > max_width {
            truncate_at = i;
            let remaining = max_width.saturating_sub(total);
            if remaining > 0 {
                let truncated = unicode::truncate_to_width(&span.content, remaining);
                spans[i] = Span::styled(truncated, span.style);
                truncate_at = i + 1;
            }
            break;
        }
        total += span_width;
    }

    spans.truncate(truncate_at);
}

/// Prompt text with a block cursor at the prompt's cursor position
pub(super) fn prompt_spans(prompt: &Prompt, text_style: Style, cursor_style: Style) -> Vec<Span<'static>> {
    let (before, after) = prompt.text.split_at(prompt.cursor.min(prompt.text.len()));
    vec![
        Span::styled(before.to_string(), text_style),
        Span::styled("\u{258C}", cursor_style),
        Span::styled(after.to_string(), text_style),
    ]
}

/// Title spans with query matches highlighted. Completed tasks are dimmed
/// and struck through.
pub(super) fn title_spans<S: Storage>(app: &App<S>, task: &Task, row_bg: Color) -> Vec<Span<'static>> {
    let theme = &app.theme;
    let mut title_style = Style::default().fg(theme.text).bg(row_bg);
    if task.is_completed() {
        title_style = title_style
            .fg(theme.dim)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);
    let mut spans = Vec::new();
    super::push_highlighted_spans(&mut spans, &task.title, title_style, match_style, app.active_query());
    spans
}

/// Priority and tag spans, each with a leading space
pub(super) fn meta_spans<S: Storage>(app: &App<S>, task: &Task, row_bg: Color) -> Vec<Span<'static>> {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        format!(" !{}", task.priority.as_str()),
        Style::default().fg(theme.priority_color(task.priority)).bg(row_bg),
    )];
    for tag in &task.tags {
        spans.push(Span::styled(
            format!(" #{}", tag),
            Style::default().fg(theme.tag_color(tag)).bg(row_bg),
        ));
    }
    spans
}
