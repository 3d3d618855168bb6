use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::task::{Priority, Status, Task};
use crate::ops::task_ops::LaneCounts;
use crate::util::time::format_due;
use crate::util::unicode::fit_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardJson<'a> {
    pub pending: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsJson {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total: usize,
}

impl From<LaneCounts> for StatsJson {
    fn from(c: LaneCounts) -> Self {
        StatsJson {
            pending: c.pending,
            in_progress: c.in_progress,
            completed: c.completed,
            total: c.total(),
        }
    }
}

#[derive(Serialize)]
pub struct CalendarDayJson<'a> {
    pub date: String,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct CalendarMonthJson {
    pub year: i32,
    pub month: u32,
    pub days: Vec<u32>,
}

#[derive(Serialize)]
pub struct ChangeJson {
    pub id: String,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

pub fn recovery_entry_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => " !high",
        Priority::Medium => "",
        Priority::Low => " !low",
    }
}

fn tags_suffix(task: &Task) -> String {
    task.tags.iter().map(|t| format!(" #{}", t)).collect()
}

/// One-line summary: `[x] task-1 Title !high #work due:2024-06-12`
pub fn format_task_line(task: &Task) -> String {
    let due = task
        .due_date
        .map(|d| format!(" due:{}", format_due(d)))
        .unwrap_or_default();
    format!(
        "[{}] {} {}{}{}{}",
        task.status.checkbox_char(),
        task.id,
        task.title,
        priority_marker(task.priority),
        tags_suffix(task),
        due
    )
}

pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![format!(
        "[{}] {} {}",
        task.status.checkbox_char(),
        task.id,
        task.title
    )];
    lines.push(format!("status: {}", task.status));
    lines.push(format!("priority: {}", task.priority));
    if !task.tags.is_empty() {
        lines.push(format!(
            "tags: {}",
            task.tags
                .iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        ));
    }
    lines.push(format!(
        "created: {}",
        task.created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    ));
    if let Some(due) = task.due_date {
        lines.push(format!("due: {}", format_due(due)));
    }
    if !task.description.is_empty() {
        lines.push("description:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }
    if let Some(subtasks) = &task.subtasks
        && !subtasks.is_empty()
    {
        lines.push("subtasks:".to_string());
        for sub in subtasks {
            let mark = if sub.completed { 'x' } else { ' ' };
            lines.push(format!("  [{}] {}", mark, sub.title));
        }
    }
    lines
}

const BOARD_COLUMN_WIDTH: usize = 30;

/// The three lanes side by side, one card per row
pub fn format_board(lanes: &[Vec<&Task>; 3]) -> Vec<String> {
    let header: Vec<String> = Status::ALL
        .iter()
        .zip(lanes.iter())
        .map(|(s, lane)| fit_to_width(&format!("{} ({})", s.label(), lane.len()), BOARD_COLUMN_WIDTH))
        .collect();
    let rule = vec!["-".repeat(BOARD_COLUMN_WIDTH); 3];

    let mut lines = vec![join_row(&header), join_row(&rule)];
    let rows = lanes.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..rows {
        let cells: Vec<String> = lanes
            .iter()
            .map(|lane| {
                let text = lane
                    .get(row)
                    .map(|t| format!("{} {}", t.id, t.title))
                    .unwrap_or_default();
                fit_to_width(&text, BOARD_COLUMN_WIDTH)
            })
            .collect();
        lines.push(join_row(&cells));
    }
    lines
}

fn join_row(cells: &[String]) -> String {
    cells.join(" | ").trim_end().to_string()
}

pub fn format_stats(counts: LaneCounts) -> Vec<String> {
    let mut lines: Vec<String> = Status::ALL
        .iter()
        .map(|s| format!("{:<12} {}", s.label(), counts.get(*s)))
        .collect();
    lines.push(format!("{:<12} {}", "Total", counts.total()));
    lines
}

pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}: {}",
        entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("    {}", line));
    }
    lines
}
