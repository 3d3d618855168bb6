use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::model::task::Task;
use crate::tui::app::App;
use crate::util::time::{format_due, relative_time};
use crate::util::unicode;

use super::helpers::{meta_spans, spans_width, status_symbol, title_spans, truncate_spans};

/// Render every visible task as one row, in collection order
pub fn render_list_view<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let tasks = app.visible_tasks();

    if tasks.is_empty() {
        let msg = if app.active_query().is_empty() {
            " No tasks"
        } else {
            " no matching tasks"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let visible_height = area.height as usize;
    let cursor = app.list_cursor;
    let scroll = if visible_height > 0 && cursor >= visible_height {
        cursor + 1 - visible_height
    } else {
        0
    };

    let now = Utc::now();
    let lines: Vec<Line> = tasks
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(row, task)| task_row(app, task, row == cursor, area.width as usize, now))
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn task_row<S: Storage>(
    app: &App<S>,
    task: &Task,
    is_cursor: bool,
    width: usize,
    now: chrono::DateTime<Utc>,
) -> Line<'static> {
    let bg = app.theme.background;
    let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
    let dim_style = Style::default().fg(app.theme.dim).bg(row_bg);

    let mut spans = vec![
        if is_cursor {
            Span::styled("\u{258E}", Style::default().fg(app.theme.highlight).bg(row_bg))
        } else {
            Span::styled(" ", Style::default().bg(bg))
        },
        Span::styled(
            format!("{} ", status_symbol(task.status)),
            Style::default().fg(app.theme.status_color(task.status)).bg(row_bg),
        ),
    ];
    spans.extend(title_spans(app, task, row_bg));
    spans.extend(meta_spans(app, task, row_bg));

    // Right column: due date, then age
    let mut right = String::new();
    if let Some(due) = task.due_date {
        right.push_str(&format!("due {}  ", format_due(due)));
    }
    right.push_str(&relative_time(task.created_at, now));
    right.push(' ');
    let right_width = unicode::display_width(&right);

    truncate_spans(&mut spans, width.saturating_sub(right_width + 1));
    let used = spans_width(&spans);
    if used + right_width <= width {
        spans.push(Span::styled(
            " ".repeat(width - used - right_width),
            Style::default().bg(row_bg),
        ));
        spans.push(Span::styled(right, dim_style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Status;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn rows_follow_collection_order() {
        let app = app_with_seed();
        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_list_view(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("\u{258E}[ ] Plan the week !high #work"));
        assert!(lines[2].starts_with(" [>] Draft project proposal !high #work #design"));
        assert!(lines[4].starts_with(" [x] Set up the task board"));
        assert!(lines[0].contains("due "));
        assert!(lines[0].ends_with("ago"));
    }

    #[test]
    fn empty_board_and_empty_filter() {
        let app = app_with_tasks(vec![]);
        let output = render_to_string(TERM_W, 4, |frame, area| {
            render_list_view(frame, &app, area);
        });
        assert_eq!(output, " No tasks");

        let mut app = app_with_tasks(vec![task("a", "Walk", Status::Pending)]);
        app.query = "swim".into();
        let output = render_to_string(TERM_W, 4, |frame, area| {
            render_list_view(frame, &app, area);
        });
        assert_eq!(output, " no matching tasks");
    }
}
