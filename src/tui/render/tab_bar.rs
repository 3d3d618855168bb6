use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::model::config::ViewMode;
use crate::ops::task_ops;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the tab bar: board name and view tabs, with a separator line below
pub fn render_tab_bar<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();

    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled(
        format!(" {} ", app.board_name),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    sep_cols.push(spans_width(&spans));
    spans.push(sep.clone());

    for (i, view) in ViewMode::ALL.into_iter().enumerate() {
        spans.push(Span::styled(
            format!(" {} {} ", i + 1, view.label()),
            tab_style(app, app.view == view),
        ));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Right-aligned lane counts
    if app.store.is_ready() {
        let counts = task_ops::lane_counts(app.store.tasks());
        let summary = format!(
            "{} open  {} done ",
            counts.pending + counts.in_progress,
            counts.completed
        );
        let used = spans_width(&spans);
        let width = area.width as usize;
        if used + summary.len() < width {
            spans.push(Span::styled(" ".repeat(width - used - summary.len()), bg_style));
            spans.push(Span::styled(summary, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let tabs = Paragraph::new(Line::from(spans)).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;

    // Active filter shown at the right end of the separator
    let query = app.active_query();
    let indicator = if query.is_empty() {
        String::new()
    } else {
        format!(" filter: {} ", query)
    };
    let indicator_width = crate::util::unicode::display_width(&indicator);
    let separator_end = width.saturating_sub(indicator_width + 1);

    let mut line = String::with_capacity(width * 3);
    for col in 0..separator_end {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }

    let mut spans = vec![Span::styled(line, Style::default().fg(app.theme.dim).bg(bg))];
    if !indicator.is_empty() {
        spans.push(Span::styled(
            indicator,
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style<S: Storage>(app: &App<S>, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
