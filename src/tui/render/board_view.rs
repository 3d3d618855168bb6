use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::model::task::{Status, Task};
use crate::tui::app::App;
use crate::util::time::format_due;

use super::helpers::{meta_spans, status_symbol, title_spans, truncate_spans};

/// Each card takes a title row and a metadata row
const CARD_HEIGHT: usize = 2;

/// Render the three lanes side by side
pub fn render_board_view<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (status, column) in Status::ALL.into_iter().zip(columns.iter()) {
        render_lane(frame, app, status, *column);
    }
}

fn render_lane<S: Storage>(frame: &mut Frame, app: &App<S>, status: Status, area: Rect) {
    let bg = app.theme.background;
    let lane = status.index();
    let focused = app.lane == lane;
    let tasks = app.lane_tasks(lane);
    // One column of padding on the right keeps lanes apart
    let width = (area.width as usize).saturating_sub(1);

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);

    let mut header_style = Style::default()
        .fg(app.theme.status_color(status))
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    if focused {
        header_style = header_style.add_modifier(Modifier::UNDERLINED);
    }
    lines.push(Line::from(Span::styled(
        format!(" {} ({})", status.label(), tasks.len()),
        header_style,
    )));

    if tasks.is_empty() {
        let msg = if app.active_query().is_empty() {
            " No tasks"
        } else {
            " no matching tasks"
        };
        lines.push(Line::from(Span::styled(
            msg,
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    } else {
        let visible_cards = (area.height as usize).saturating_sub(1) / CARD_HEIGHT;
        let cursor = app.cursors[lane];
        let scroll = if visible_cards > 0 && cursor >= visible_cards {
            cursor + 1 - visible_cards
        } else {
            0
        };
        for (row, task) in tasks.iter().enumerate().skip(scroll).take(visible_cards) {
            let is_cursor = focused && row == cursor;
            lines.extend(card_lines(app, task, is_cursor, width));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        area,
    );
}

fn card_lines<S: Storage>(app: &App<S>, task: &Task, is_cursor: bool, width: usize) -> [Line<'static>; 2] {
    let bg = app.theme.background;
    let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
    let bar = if is_cursor {
        Span::styled("\u{258E}", Style::default().fg(app.theme.highlight).bg(row_bg))
    } else {
        Span::styled(" ", Style::default().bg(bg))
    };

    let mut title = vec![
        bar.clone(),
        Span::styled(
            format!("{} ", status_symbol(task.status)),
            Style::default().fg(app.theme.status_color(task.status)).bg(row_bg),
        ),
    ];
    title.extend(title_spans(app, task, row_bg));
    truncate_spans(&mut title, width);

    let mut meta = vec![bar, Span::styled("   ", Style::default().bg(row_bg))];
    meta.extend(meta_spans(app, task, row_bg));
    if let Some(due) = task.due_date {
        meta.push(Span::styled(
            format!(" {}", format_due(due)),
            Style::default().fg(app.theme.dim).bg(row_bg),
        ));
    }
    truncate_spans(&mut meta, width);

    [Line::from(title), Line::from(meta)]
}
