use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::store::Storage;
use crate::model::config::ViewMode;
use crate::tui::app::{App, Mode};

use super::helpers::{prompt_spans, spans_width};

/// Render the status row (bottom of screen)
pub fn render_status_row<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint): (Vec<Span>, String) = match app.mode {
        Mode::Navigate => {
            let spans = match &app.message {
                Some(msg) => vec![Span::styled(
                    msg.clone(),
                    Style::default().fg(app.theme.yellow).bg(bg),
                )],
                None if !app.query.is_empty() => {
                    vec![Span::styled(format!("/{}", app.query), dim_style)]
                }
                None => Vec::new(),
            };
            (spans, navigate_hint(app.view).to_string())
        }
        Mode::Search => (
            prompt_line(app, "/"),
            "Enter search  Esc cancel".to_string(),
        ),
        Mode::Add => {
            let hint = if app.suggested_tags.is_empty() {
                "Enter add  Esc cancel".to_string()
            } else {
                let tags: Vec<String> = app.suggested_tags.iter().map(|t| format!("#{}", t)).collect();
                tags.join(" ")
            };
            (prompt_line(app, "new: "), hint)
        }
        Mode::ConfirmDelete => {
            let title = app
                .pending_delete
                .as_deref()
                .and_then(|id| app.store.get(id))
                .map(|t| t.title.as_str())
                .unwrap_or_default();
            (
                vec![Span::styled(
                    format!("delete \"{}\"? ", title),
                    Style::default().fg(app.theme.red).bg(bg),
                )],
                "y delete  n cancel".to_string(),
            )
        }
        Mode::Edit => {
            let heading = match &app.edit {
                Some(form) if form.is_new() => "new task",
                _ => "editing",
            };
            (
                vec![Span::styled(heading, dim_style)],
                "Tab field  Enter save  Esc cancel".to_string(),
            )
        }
    };

    let content_width = spans_width(&spans);
    let hint_width = crate::util::unicode::display_width(&hint);
    if content_width + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, dim_style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// The app's prompt after `prefix`, with a block cursor
fn prompt_line<S: Storage>(app: &App<S>, prefix: &str) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let cursor_style = Style::default().fg(app.theme.highlight).bg(bg);
    let mut spans = vec![Span::styled(prefix.to_string(), text_style)];
    spans.extend(prompt_spans(&app.prompt, text_style, cursor_style));
    spans
}

fn navigate_hint(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Kanban => "a add  e edit  space done  H/L move  / search  q quit",
        ViewMode::List => "a add  e edit  space done  J/K move  / search  q quit",
        ViewMode::Calendar => "a add due  h/l day  j/k week  t today  q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Prompt;
    use crate::tui::render::test_helpers::*;

    fn render(app: &App<crate::io::store::MemoryStorage>) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn navigate_shows_hint_and_query() {
        let mut app = app_with_seed();
        assert!(render(&app).ends_with("q quit"));
        app.query = "week".into();
        assert!(render(&app).starts_with("/week"));
    }

    #[test]
    fn search_prompt_shows_cursor() {
        let mut app = app_with_seed();
        app.mode = Mode::Search;
        app.prompt = Prompt {
            text: "plan".into(),
            cursor: 2,
        };
        let output = render(&app);
        assert!(output.starts_with("/pl\u{258C}an"));
        assert!(output.ends_with("Enter search  Esc cancel"));
    }

    #[test]
    fn message_replaces_query() {
        let mut app = app_with_seed();
        app.query = "week".into();
        app.message = Some("title must not be empty".into());
        assert!(render(&app).starts_with("title must not be empty"));
    }

    #[test]
    fn confirm_names_the_task() {
        let mut app = app_with_seed();
        app.mode = Mode::ConfirmDelete;
        app.pending_delete = Some("seed-4".into());
        let output = render(&app);
        assert!(output.starts_with("delete \"Morning run\"?"));
        assert!(output.ends_with("y delete  n cancel"));
    }

    #[test]
    fn edit_mode_shows_form_keys() {
        let mut app = app_with_seed();
        app.begin_edit();
        let output = render(&app);
        assert!(output.starts_with("editing"));
        assert!(output.ends_with("Tab field  Enter save  Esc cancel"));
    }

    #[test]
    fn add_prompt_suggests_tags() {
        let mut app = app_with_seed();
        app.mode = Mode::Add;
        app.suggested_tags = vec!["work".into(), "health".into()];
        let output = render(&app);
        assert!(output.starts_with("new: \u{258C}"));
        assert!(output.ends_with("#work #health"));
    }
}
