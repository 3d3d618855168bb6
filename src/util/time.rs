use chrono::{DateTime, Local, Utc};

/// Coarse "how long ago" text for a creation timestamp
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }
    let minutes = secs / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if secs < 45 {
        "just now".to_string()
    } else if minutes < 2 {
        "a minute ago".to_string()
    } else if minutes < 60 {
        format!("{} minutes ago", minutes)
    } else if hours < 2 {
        "an hour ago".to_string()
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if days < 2 {
        "yesterday".to_string()
    } else if days < 30 {
        format!("{} days ago", days)
    } else if days < 60 {
        "a month ago".to_string()
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else if days < 730 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", days / 365)
    }
}

/// Due date as a local calendar day, `YYYY-MM-DD`
pub fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d").to_string()
}
