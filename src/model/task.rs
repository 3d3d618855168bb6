use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Lane a task belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Prefix that marks a drop target as a lane rather than a task
pub const LANE_ID_PREFIX: &str = "column-";

impl Status {
    /// All lanes, in board order (left to right)
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    /// Wire name, as stored in JSON
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }

    /// Human-readable column title
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            Status::Pending => ' ',
            Status::InProgress => '>',
            Status::Completed => 'x',
        }
    }

    /// Position of the lane on the board (0 = leftmost)
    pub fn index(self) -> usize {
        match self {
            Status::Pending => 0,
            Status::InProgress => 1,
            Status::Completed => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<Status> {
        Status::ALL.get(idx).copied()
    }

    /// Parse a wire name. Underscores and missing dashes are tolerated for
    /// command-line convenience (`in_progress`, `inprogress`).
    pub fn parse_status(s: &str) -> Option<Status> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Status::Pending),
            "in-progress" | "in_progress" | "inprogress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }

    /// Drop-target identifier of this lane, e.g. `column-in-progress`
    pub fn lane_id(self) -> String {
        format!("{}{}", LANE_ID_PREFIX, self.as_str())
    }

    /// Inverse of [`Status::lane_id`]. Only exact wire names are accepted.
    pub fn from_lane_id(id: &str) -> Option<Status> {
        let name = id.strip_prefix(LANE_ID_PREFIX)?;
        Status::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// The priority `delta` steps away, wrapping around
    pub fn cycle(self, delta: isize) -> Priority {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(idx + delta).rem_euclid(len) as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse_priority(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checklist item carried on a task. Stored and round-tripped, never
/// interpreted by any board operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// A task as persisted in the board's storage entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque, unique, assigned by the store
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    /// Insertion-ordered, duplicate-free
    #[serde(default)]
    pub tags: IndexSet<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}

/// A task that has not been added to the store yet: everything but `id` and
/// `createdAt`, which the store assigns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub tags: IndexSet<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Attach the store-assigned identity
    pub fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            created_at,
            due_date: self.due_date,
            subtasks: self.subtasks,
        }
    }
}
