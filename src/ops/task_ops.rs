use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use indexmap::IndexSet;

use crate::model::task::{Priority, Status, Task, TaskDraft};

/// Error type for input-boundary checks on task fields
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("invalid status: {0} (expected pending, in-progress, completed)")]
    InvalidStatus(String),
    #[error("invalid priority: {0} (expected low, medium, high)")]
    InvalidPriority(String),
    #[error("invalid date: {0} (expected YYYY-MM-DD or an RFC 3339 timestamp)")]
    InvalidDate(String),
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Reject titles that are empty once trimmed. The title itself is stored as
/// typed.
pub fn validate_title(title: &str) -> Result<(), TaskError> {
    if title.trim().is_empty() {
        Err(TaskError::EmptyTitle)
    } else {
        Ok(())
    }
}

pub fn parse_status(s: &str) -> Result<Status, TaskError> {
    Status::parse_status(s).ok_or_else(|| TaskError::InvalidStatus(s.to_string()))
}

pub fn parse_priority(s: &str) -> Result<Priority, TaskError> {
    Priority::parse_priority(s).ok_or_else(|| TaskError::InvalidPriority(s.to_string()))
}

/// Parse a due date. A bare `YYYY-MM-DD` means local midnight of that day;
/// full RFC 3339 timestamps are taken as-is.
pub fn parse_due_date(s: &str) -> Result<DateTime<Utc>, TaskError> {
    parse_due_date_in(s, &Local)
}

pub fn parse_due_date_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Utc>, TaskError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| local_midnight(d, tz))
        .ok_or_else(|| TaskError::InvalidDate(s.to_string()))
}

/// Start of `date` in time zone `tz`, as UTC. None only when midnight does
/// not exist there.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Add a tag (trimmed). Blank and duplicate tags are ignored.
/// Returns true if the set changed.
pub fn add_tag(tags: &mut IndexSet<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() {
        return false;
    }
    tags.insert(tag.to_string())
}

/// Remove a tag, keeping the order of the remaining ones.
/// Returns true if the set changed.
pub fn remove_tag(tags: &mut IndexSet<String>, tag: &str) -> bool {
    tags.shift_remove(tag.trim())
}

/// Tags typed as a list: separated by spaces or commas, `#` optional.
pub fn parse_tag_list(input: &str) -> IndexSet<String> {
    let mut tags = IndexSet::new();
    for word in input.split(|c: char| c.is_whitespace() || c == ',') {
        add_tag(&mut tags, word.strip_prefix('#').unwrap_or(word));
    }
    tags
}

/// Draft from a one-line quick-add: `#word` tokens become tags, the other
/// words form the title.
pub fn parse_quick_add(input: &str) -> TaskDraft {
    let mut tags = IndexSet::new();
    let mut words = Vec::new();
    for word in input.split_whitespace() {
        match word.strip_prefix('#') {
            Some(tag) if !tag.is_empty() => {
                add_tag(&mut tags, tag);
            }
            _ => words.push(word),
        }
    }
    let mut draft = TaskDraft::new(words.join(" "));
    draft.tags = tags;
    draft
}

// ---------------------------------------------------------------------------
// Lane statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaneCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl LaneCounts {
    pub fn get(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }
}

pub fn lane_counts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> LaneCounts {
    let mut counts = LaneCounts::default();
    for task in tasks {
        match task.status {
            Status::Pending => counts.pending += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Status written by the completion checkbox: checked means completed,
/// unchecked always means pending (an in-progress task that is checked and
/// unchecked ends up pending).
pub fn checkbox_status(completed: bool) -> Status {
    if completed {
        Status::Completed
    } else {
        Status::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn title_validation() {
        assert!(validate_title("Buy milk").is_ok());
        assert!(validate_title("  padded  ").is_ok());
        assert!(matches!(validate_title(""), Err(TaskError::EmptyTitle)));
        assert!(matches!(validate_title(" \t "), Err(TaskError::EmptyTitle)));
    }

    #[test]
    fn parse_enums() {
        assert_eq!(parse_status("in-progress").unwrap(), Status::InProgress);
        assert!(matches!(
            parse_status("later"),
            Err(TaskError::InvalidStatus(_))
        ));
        assert_eq!(parse_priority("HIGH").unwrap(), Priority::High);
        assert!(parse_priority("urgent").is_err());
    }

    #[test]
    fn due_date_formats() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let day = parse_due_date_in("2024-06-12", &brt).unwrap();
        assert_eq!(day.to_rfc3339(), "2024-06-12T03:00:00+00:00");

        let exact = parse_due_date_in("2024-06-12T15:30:00+02:00", &brt).unwrap();
        assert_eq!(exact.to_rfc3339(), "2024-06-12T13:30:00+00:00");

        assert!(matches!(
            parse_due_date_in("12/06/2024", &brt),
            Err(TaskError::InvalidDate(_))
        ));
    }

    #[test]
    fn tags_stay_unique_and_ordered() {
        let mut tags = IndexSet::new();
        assert!(add_tag(&mut tags, "work"));
        assert!(add_tag(&mut tags, " home "));
        assert!(!add_tag(&mut tags, "work"));
        assert!(!add_tag(&mut tags, "   "));
        assert!(add_tag(&mut tags, "errands"));
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec!["work", "home", "errands"]
        );

        assert!(remove_tag(&mut tags, "home"));
        assert!(!remove_tag(&mut tags, "home"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["work", "errands"]);
    }

    #[test]
    fn tag_lists_accept_commas_and_hashes() {
        let tags = parse_tag_list("#work, home  work ,,#");
        let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["work", "home"]);
        assert!(parse_tag_list("  ").is_empty());
    }

    #[test]
    fn quick_add_extracts_tags() {
        let draft = parse_quick_add("Review  slides #work #presentation #work");
        assert_eq!(draft.title, "Review slides");
        assert_eq!(
            draft.tags.iter().collect::<Vec<_>>(),
            vec!["work", "presentation"]
        );

        let draft = parse_quick_add("Issue # 42");
        assert_eq!(draft.title, "Issue # 42");
        assert!(draft.tags.is_empty());

        assert_eq!(parse_quick_add("#only #tags").title, "");
    }

    #[test]
    fn checkbox_mapping_is_binary() {
        assert_eq!(checkbox_status(true), Status::Completed);
        assert_eq!(checkbox_status(false), Status::Pending);
    }
}
