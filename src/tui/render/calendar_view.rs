use chrono::{Datelike, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::ops::calendar;
use crate::tui::app::App;

use super::helpers::{meta_spans, status_symbol, title_spans, truncate_spans};

const WEEKDAYS: &str = " Su  Mo  Tu  We  Th  Fr  Sa";
const GRID_WIDTH: u16 = 30;

/// Month grid on the left, the selected day's tasks on the right
pub fn render_calendar_view<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(GRID_WIDTH), Constraint::Min(1)])
        .split(area);

    render_month(frame, app, chunks[0]);
    render_day(frame, app, chunks[1]);
}

fn render_month<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let selected = app.calendar_date;
    let due_days = calendar::due_days_in_month(
        app.visible_tasks(),
        selected.year(),
        selected.month(),
        &Local,
    );
    let today_in_month = (app.today.year() == selected.year()
        && app.today.month() == selected.month())
    .then(|| app.today.day());

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", selected.format("%B %Y")),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(WEEKDAYS, Style::default().fg(app.theme.dim).bg(bg))),
    ];

    for week in calendar::month_grid(selected) {
        let mut spans = Vec::with_capacity(7);
        for cell in week {
            let Some(day) = cell else {
                spans.push(Span::styled("    ", Style::default().bg(bg)));
                continue;
            };
            let has_tasks = due_days.contains(&day);
            let mut style = Style::default().fg(app.theme.text).bg(bg);
            if has_tasks {
                style = style.fg(app.theme.highlight);
            }
            if today_in_month == Some(day) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if day == selected.day() {
                style = style.bg(app.theme.selection_bg).add_modifier(Modifier::BOLD);
            }
            let marker = if has_tasks { '\u{2022}' } else { ' ' };
            spans.push(Span::styled(format!("{:>3}{}", day, marker), style));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn render_day<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let tasks = app.day_tasks();
    let width = area.width as usize;

    let mut lines = vec![Line::from(Span::styled(
        format!(" {} ({})", app.calendar_date.format("%a %-d %b"), tasks.len()),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))];

    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            " Nothing due",
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }
    for task in tasks.iter().take((area.height as usize).saturating_sub(1)) {
        let mut spans = vec![Span::styled(
            format!(" {} ", status_symbol(task.status)),
            Style::default().fg(app.theme.status_color(task.status)).bg(bg),
        )];
        spans.extend(title_spans(app, task, bg));
        spans.extend(meta_spans(app, task, bg));
        truncate_spans(&mut spans, width);
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::ViewMode;
    use crate::model::task::Status;
    use crate::ops::task_ops::local_midnight;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn month_grid_marks_due_days() {
        let mut due = task("a", "Dentist", Status::Pending);
        due.due_date = local_midnight(today(), &Local);
        let mut app = app_with_tasks(vec![due]);
        app.view = ViewMode::Calendar;

        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_calendar_view(frame, &app, area);
        });
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with(" January 2025"));
        assert!(lines[1].starts_with(WEEKDAYS));
        // 2025-01-01 is a Wednesday
        assert!(lines[2].starts_with(&format!("{}1   2   3   4", " ".repeat(14))));
        assert!(output.contains(" 10\u{2022}"));
        assert!(!output.contains(" 11\u{2022}"));
        assert!(output.contains("Fri 10 Jan (1)"));
        assert!(output.contains("[ ] Dentist !medium"));
    }

    #[test]
    fn empty_day() {
        let mut app = app_with_tasks(vec![task("a", "Undated", Status::Pending)]);
        app.calendar_date = calendar::shift_days(today(), 3);
        let output = render_to_string(TERM_W, 10, |frame, area| {
            render_calendar_view(frame, &app, area);
        });
        assert!(output.contains("Mon 13 Jan (0)"));
        assert!(output.contains("Nothing due"));
    }
}
