use chrono::{DateTime, Utc};
use indexmap::IndexSet;

use super::task::{Priority, Status, Task};

fn at(unix_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_secs, 0).unwrap_or_default()
}

fn tags(names: &[&str]) -> IndexSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// The fixed collection a board starts from when storage holds nothing
/// usable. Always the same tasks, ids and timestamps.
pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "seed-1".into(),
            title: "Plan the week".into(),
            description: "List the three things that must get done by Friday.".into(),
            status: Status::Pending,
            priority: Priority::High,
            tags: tags(&["work"]),
            created_at: at(1_736_154_000),
            due_date: Some(at(1_736_534_700)),
            subtasks: None,
        },
        Task {
            id: "seed-2".into(),
            title: "Read chapter 4".into(),
            description: "Ownership and borrowing, with the exercises.".into(),
            status: Status::Pending,
            priority: Priority::Medium,
            tags: tags(&["study"]),
            created_at: at(1_736_260_200),
            due_date: Some(at(1_736_942_400)),
            subtasks: None,
        },
        Task {
            id: "seed-3".into(),
            title: "Draft project proposal".into(),
            description: "Scope, milestones and a rough budget.".into(),
            status: Status::InProgress,
            priority: Priority::High,
            tags: tags(&["work", "design"]),
            created_at: at(1_736_324_100),
            due_date: Some(at(1_737_374_400)),
            subtasks: None,
        },
        Task {
            id: "seed-4".into(),
            title: "Morning run".into(),
            description: String::new(),
            status: Status::InProgress,
            priority: Priority::Low,
            tags: tags(&["health", "personal"]),
            created_at: at(1_736_406_000),
            due_date: None,
            subtasks: None,
        },
        Task {
            id: "seed-5".into(),
            title: "Set up the task board".into(),
            description: "Try dragging cards between lanes.".into(),
            status: Status::Completed,
            priority: Priority::Medium,
            tags: tags(&["personal"]),
            created_at: at(1_736_154_000),
            due_date: None,
            subtasks: None,
        },
    ]
}
