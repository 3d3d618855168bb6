use chrono::{DateTime, NaiveDate, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::{MemoryStorage, TaskStore};
use crate::model::config::{DEFAULT_NAMESPACE, UiConfig};
use crate::model::seed::seed_tasks;
use crate::model::task::{Status, Task, TaskDraft};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Fixed "today" for views that depend on the date
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

fn fixed_clock() -> DateTime<Utc> {
    DateTime::from_timestamp(1_736_500_000, 0).unwrap()
}

/// A task with the given id, title and lane
pub fn task(id: &str, title: &str, status: Status) -> Task {
    let mut draft = TaskDraft::new(title);
    draft.status = status;
    draft.into_task(id.to_string(), fixed_clock())
}

/// A loaded app over an in-memory store holding `tasks`.
pub fn app_with_tasks(tasks: Vec<Task>) -> App<MemoryStorage> {
    let json = serde_json::to_string(&tasks).unwrap();
    let storage = MemoryStorage::with_entry(DEFAULT_NAMESPACE, &json);
    let store = TaskStore::with_clock(storage, DEFAULT_NAMESPACE, fixed_clock);
    let mut app = App::new(store, "Test", &UiConfig::default(), today());
    app.ensure_loaded();
    app
}

/// A loaded app over the seed collection.
pub fn app_with_seed() -> App<MemoryStorage> {
    app_with_tasks(seed_tasks())
}
