use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::task::{Priority, Status};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-tag colors
    pub tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut tag_colors = HashMap::new();
        tag_colors.insert("work".into(), Color::Rgb(0x7C, 0x44, 0x4F));
        tag_colors.insert("personal".into(), Color::Rgb(0x9F, 0x52, 0x55));
        tag_colors.insert("study".into(), Color::Rgb(0xE1, 0x6A, 0x54));
        tag_colors.insert("health".into(), Color::Rgb(0xF3, 0x9E, 0x60));

        Theme {
            background: Color::Rgb(0x1A, 0x12, 0x15),
            text: Color::Rgb(0xE8, 0xD9, 0xD2),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xE1, 0x6A, 0x54),
            dim: Color::Rgb(0x7C, 0x6A, 0x6E),
            red: Color::Rgb(0xE1, 0x6A, 0x54),
            yellow: Color::Rgb(0xF3, 0x9E, 0x60),
            green: Color::Rgb(0x7F, 0xB7, 0x7E),
            selection_bg: Color::Rgb(0x3A, 0x24, 0x2B),
            search_match_bg: Color::Rgb(0xF3, 0x9E, 0x60),
            search_match_fg: Color::Rgb(0x1A, 0x12, 0x15),
            tag_colors,
        }
    }
}

/// Parse `#RRGGBB`
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Defaults with any `[ui.colors]` and `[ui.tag_colors]` overrides applied.
    /// Unparsable colors are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => {}
            }
        }

        for (tag, value) in &ui.tag_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.tag_colors.insert(tag.clone(), color);
            }
        }

        theme
    }

    pub fn tag_color(&self, tag: &str) -> Color {
        self.tag_colors.get(tag).copied().unwrap_or(self.dim)
    }

    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Pending => self.text,
            Status::InProgress => self.highlight,
            Status::Completed => self.green,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.dim,
        }
    }
}
