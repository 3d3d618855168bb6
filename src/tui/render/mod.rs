pub mod board_view;
pub mod calendar_view;
pub mod edit_popup;
pub mod helpers;
pub mod list_view;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};

use crate::io::store::Storage;
use crate::model::config::ViewMode;
use crate::ops::search;

use super::app::{App, Mode};

/// Main render function: dispatches to sub-renderers
pub fn render<S: Storage>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    if !app.store.is_ready() {
        render_loading(frame, app, chunks[1]);
    } else {
        match app.view {
            ViewMode::Kanban => board_view::render_board_view(frame, app, chunks[1]),
            ViewMode::List => list_view::render_list_view(frame, app, chunks[1]),
            ViewMode::Calendar => calendar_view::render_calendar_view(frame, app, chunks[1]),
        }
        if app.mode == Mode::Edit {
            edit_popup::render_edit_popup(frame, app, chunks[1]);
        }
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Shown until the store has finished its first load
fn render_loading<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let msg = "Loading tasks\u{2026}";
    let row = Rect {
        y: area.y + area.height / 2,
        height: 1.min(area.height),
        ..area
    };
    let loading = Paragraph::new(msg)
        .alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(loading, row);
}

/// Push spans for `text` with the query's occurrences highlighted. With an
/// empty query or no match, pushes a single span with `base_style`.
pub(super) fn push_highlighted_spans(
    spans: &mut Vec<Span<'static>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    query: &str,
) {
    let mut last_end = 0;
    for m in search::find_matches(text, query) {
        if m.start > last_end {
            spans.push(Span::styled(text[last_end..m.start].to_string(), base_style));
        }
        spans.push(Span::styled(text[m.clone()].to_string(), highlight_style));
        last_end = m.end;
    }
    if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}
