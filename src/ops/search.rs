use std::ops::Range;

use crate::model::task::Task;

/// Which field of a task matched a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
    Tag,
}

/// Fields of `task` containing `query` (case-insensitive). An empty query
/// matches nothing here; see [`filter_tasks`] for the "empty matches all" rule.
pub fn matching_fields(task: &Task, query: &str) -> Vec<MatchField> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut fields = Vec::new();
    if task.title.to_lowercase().contains(&needle) {
        fields.push(MatchField::Title);
    }
    if task.description.to_lowercase().contains(&needle) {
        fields.push(MatchField::Description);
    }
    if task.tags.iter().any(|t| t.to_lowercase().contains(&needle)) {
        fields.push(MatchField::Tag);
    }
    fields
}

/// Whether a task matches the search box. The empty query matches every task.
pub fn task_matches(task: &Task, query: &str) -> bool {
    query.is_empty() || !matching_fields(task, query).is_empty()
}

/// The subsequence of `tasks` matching `query`, in collection order.
/// Applied before lanes are split out, in every view.
pub fn filter_tasks<'a>(query: &str, tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks.iter().filter(|t| task_matches(t, query)).collect()
}

/// Byte ranges of case-insensitive occurrences of `query` in `text`, for
/// highlighting. Text whose lowercase form changes byte length gets no
/// ranges rather than misaligned ones.
pub fn find_matches(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let haystack = text.to_lowercase();
    if haystack.len() != text.len() {
        return Vec::new();
    }
    haystack
        .match_indices(&needle)
        .map(|(start, m)| start..start + m.len())
        .collect()
}
