use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::io::store::Storage;
use crate::tui::app::App;
use crate::tui::edit_form::{EditField, EditForm};

use super::helpers::{prompt_spans, spans_width, truncate_spans};

/// Indicator plus the widest label, `priority: `
const LABEL_W: usize = 13;

/// Render the task edit form as a centered popup
pub fn render_edit_popup<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let Some(form) = &app.edit else {
        return;
    };

    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    // 60% of the width, between 36 and 64 columns
    let target_w = (area.width as f32 * 0.6) as u16;
    let inner_w = target_w
        .clamp(36, 64)
        .min(area.width.saturating_sub(2)) as usize;
    let popup_w = inner_w as u16 + 2;

    let mut lines: Vec<Line<'static>> = vec![Line::from("")];
    for field in EditField::ALL {
        let mut spans = field_spans(app, form, field);
        truncate_spans(&mut spans, inner_w);
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));

    if let Some(err) = &form.error {
        let mut spans = vec![Span::styled(
            format!("   {}", err),
            Style::default().fg(app.theme.red).bg(bg),
        )];
        truncate_spans(&mut spans, inner_w);
        lines.push(Line::from(spans));
    }

    let hint = if form.field == EditField::Priority {
        "\u{2190}\u{2192} priority  Tab field  Enter save"
    } else {
        "Tab field  Enter save  Esc cancel"
    };
    let pad = inner_w.saturating_sub(hint.chars().count()) / 2;
    lines.push(Line::from(vec![
        Span::styled(" ".repeat(pad), dim),
        Span::styled(hint, dim),
    ]));

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + area.height.saturating_sub(popup_h) / 2;
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h);

    frame.render_widget(Clear, popup_area);

    let title = if form.is_new() { " New task " } else { " Edit task " };
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(dim)
        .style(Style::default().bg(bg));

    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup_area,
    );
}

/// One row of the form: indicator, label, value
fn field_spans<S: Storage>(app: &App<S>, form: &EditForm, field: EditField) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let active = form.field == field;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default()
        .fg(if active { app.theme.text_bright } else { app.theme.text })
        .bg(bg);

    let mut spans = vec![region_indicator(active, app.theme.highlight, bg)];
    spans.push(Span::styled(format!("{}: ", field.label()), dim));
    let used = spans_width(&spans);
    if used < LABEL_W {
        spans.push(Span::styled(" ".repeat(LABEL_W - used), dim));
    }

    match form.text(field) {
        Some(prompt) if active => {
            let cursor = Style::default().fg(app.theme.highlight).bg(bg);
            spans.extend(prompt_spans(prompt, value_style, cursor));
        }
        Some(prompt) if prompt.text.is_empty() => {
            spans.push(Span::styled("(none)", dim));
        }
        Some(prompt) => spans.push(Span::styled(prompt.text.clone(), value_style)),
        None => {
            let style = Style::default()
                .fg(app.theme.priority_color(form.priority))
                .bg(bg);
            if active {
                spans.push(Span::styled("\u{25C2} ", dim));
                spans.push(Span::styled(form.priority.as_str(), style));
                spans.push(Span::styled(" \u{25B8}", dim));
            } else {
                spans.push(Span::styled(form.priority.as_str(), style));
            }
        }
    }
    spans
}

/// Accent mark on the left of the focused field
fn region_indicator(active: bool, color: Color, bg: Color) -> Span<'static> {
    if active {
        Span::styled(" \u{258E} ", Style::default().fg(color).bg(bg))
    } else {
        Span::styled("   ", Style::default().bg(bg))
    }
}
