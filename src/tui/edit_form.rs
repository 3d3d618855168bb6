use chrono::{DateTime, Utc};

use crate::model::task::{Priority, Status, Task, TaskDraft};
use crate::ops::task_ops::{self, TaskError};
use crate::util::time::format_due;

use super::app::Prompt;

/// Field focused in the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Description,
    Priority,
    Tags,
    Due,
}

impl EditField {
    pub const ALL: [EditField; 5] = [
        EditField::Title,
        EditField::Description,
        EditField::Priority,
        EditField::Tags,
        EditField::Due,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditField::Title => "title",
            EditField::Description => "desc",
            EditField::Priority => "priority",
            EditField::Tags => "tags",
            EditField::Due => "due",
        }
    }
}

/// Every editable field of one task. Text fields are prompts; the form is
/// only turned into a task when it is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    /// The task being edited, or None while creating one
    pub task_id: Option<String>,
    pub field: EditField,
    pub title: Prompt,
    pub description: Prompt,
    pub priority: Priority,
    /// Space-separated tags
    pub tags: Prompt,
    /// `YYYY-MM-DD`, an RFC 3339 timestamp, or empty for no due date
    pub due: Prompt,
    /// Lane a new task is added to
    pub status: Status,
    original_due: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl EditForm {
    pub fn for_task(task: &Task) -> Self {
        let tags: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        EditForm {
            task_id: Some(task.id.clone()),
            field: EditField::Title,
            title: Prompt::with_text(task.title.clone()),
            description: Prompt::with_text(task.description.clone()),
            priority: task.priority,
            tags: Prompt::with_text(tags.join(" ")),
            due: Prompt::with_text(task.due_date.map(format_due).unwrap_or_default()),
            status: task.status,
            original_due: task.due_date,
            error: None,
        }
    }

    pub fn for_new(status: Status, due: Option<DateTime<Utc>>) -> Self {
        EditForm {
            task_id: None,
            field: EditField::Title,
            title: Prompt::default(),
            description: Prompt::default(),
            priority: Priority::default(),
            tags: Prompt::default(),
            due: Prompt::with_text(due.map(format_due).unwrap_or_default()),
            status,
            original_due: due,
            error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.task_id.is_none()
    }

    /// The prompt behind a text field; None for the priority selector
    pub fn text(&self, field: EditField) -> Option<&Prompt> {
        match field {
            EditField::Title => Some(&self.title),
            EditField::Description => Some(&self.description),
            EditField::Tags => Some(&self.tags),
            EditField::Due => Some(&self.due),
            EditField::Priority => None,
        }
    }

    pub fn focused_text_mut(&mut self) -> Option<&mut Prompt> {
        match self.field {
            EditField::Title => Some(&mut self.title),
            EditField::Description => Some(&mut self.description),
            EditField::Tags => Some(&mut self.tags),
            EditField::Due => Some(&mut self.due),
            EditField::Priority => None,
        }
    }

    pub fn step_field(&mut self, delta: isize) {
        let idx = EditField::ALL
            .iter()
            .position(|f| *f == self.field)
            .unwrap_or(0) as isize;
        let len = EditField::ALL.len() as isize;
        self.field = EditField::ALL[(idx + delta).rem_euclid(len) as usize];
    }

    /// An untouched due field keeps the stored instant, time of day included.
    fn parsed_due(&self) -> Result<Option<DateTime<Utc>>, TaskError> {
        let text = self.due.text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if let Some(original) = self.original_due
            && text == format_due(original)
        {
            return Ok(Some(original));
        }
        task_ops::parse_due_date(text).map(Some)
    }

    /// Write the form's fields onto `task`. Nothing is changed when a field
    /// does not validate.
    pub fn apply(&self, task: &mut Task) -> Result<(), TaskError> {
        task_ops::validate_title(&self.title.text)?;
        let due = self.parsed_due()?;
        task.title = self.title.text.clone();
        task.description = self.description.text.clone();
        task.priority = self.priority;
        task.tags = task_ops::parse_tag_list(&self.tags.text);
        task.due_date = due;
        Ok(())
    }

    pub fn to_draft(&self) -> Result<TaskDraft, TaskError> {
        task_ops::validate_title(&self.title.text)?;
        let mut draft = TaskDraft::new(self.title.text.clone());
        draft.description = self.description.text.clone();
        draft.priority = self.priority;
        draft.tags = task_ops::parse_tag_list(&self.tags.text);
        draft.due_date = self.parsed_due()?;
        draft.status = self.status;
        Ok(draft)
    }
}
