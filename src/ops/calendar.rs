use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, TimeZone};

use crate::model::task::Task;

/// Whether a task is due on `date` as seen from time zone `tz`
pub fn is_due_on<Tz: TimeZone>(task: &Task, date: NaiveDate, tz: &Tz) -> bool {
    task.due_date
        .is_some_and(|due| due.with_timezone(tz).date_naive() == date)
}

/// Tasks due on `date`, in collection order
pub fn tasks_due_on<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|t| is_due_on(t, date, tz))
        .collect()
}

/// Whether any task is due on `date`
pub fn has_tasks_on<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    date: NaiveDate,
    tz: &Tz,
) -> bool {
    tasks.into_iter().any(|t| is_due_on(t, date, tz))
}

/// Days of the given month on which at least one task is due
pub fn due_days_in_month<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    year: i32,
    month: u32,
    tz: &Tz,
) -> BTreeSet<u32> {
    tasks
        .into_iter()
        .filter_map(|t| t.due_date)
        .map(|due| due.with_timezone(tz).date_naive())
        .filter(|d| d.year() == year && d.month() == month)
        .map(|d| d.day())
        .collect()
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let start = month_start(date);
    start
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(28, |last| last.day())
}

/// Calendar grid for the month containing `date`: weeks starting on Sunday,
/// `None` for cells outside the month.
pub fn month_grid(date: NaiveDate) -> Vec<[Option<u32>; 7]> {
    let start = month_start(date);
    let lead = start.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(date);

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut col = lead;
    for day in 1..=days {
        week[col] = Some(day);
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(week);
    }
    weeks
}

/// Move a date by a signed number of days, saturating at chrono's range
pub fn shift_days(date: NaiveDate, delta: i64) -> NaiveDate {
    let shifted = if delta >= 0 {
        date.checked_add_days(Days::new(delta.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskDraft;
    use chrono::{DateTime, FixedOffset, Utc};

    fn due(id: &str, rfc3339: Option<&str>) -> Task {
        let mut draft = TaskDraft::new(id);
        draft.due_date = rfc3339.map(|s| s.parse::<DateTime<Utc>>().unwrap());
        draft.into_task(id.to_string(), DateTime::from_timestamp(0, 0).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_date_respects_time_zone() {
        // 02:00 UTC on the 12th is still the 11th in UTC-3
        let task = due("a", Some("2024-06-12T02:00:00Z"));
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert!(is_due_on(&task, date(2024, 6, 12), &Utc));
        assert!(is_due_on(&task, date(2024, 6, 11), &brt));
        assert!(!is_due_on(&task, date(2024, 6, 12), &brt));
    }

    #[test]
    fn tasks_due_on_skips_undated() {
        let tasks = vec![
            due("a", Some("2024-06-12T10:00:00Z")),
            due("b", None),
            due("c", Some("2024-06-13T10:00:00Z")),
            due("d", Some("2024-06-12T23:00:00Z")),
        ];
        let hits: Vec<_> = tasks_due_on(&tasks, date(2024, 6, 12), &Utc)
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(hits, vec!["a", "d"]);
        assert!(has_tasks_on(&tasks, date(2024, 6, 13), &Utc));
        assert!(!has_tasks_on(&tasks, date(2024, 6, 14), &Utc));
    }

    #[test]
    fn due_days_for_month() {
        let tasks = vec![
            due("a", Some("2024-06-12T10:00:00Z")),
            due("b", Some("2024-06-01T10:00:00Z")),
            due("c", Some("2024-07-12T10:00:00Z")),
            due("d", Some("2024-06-12T11:00:00Z")),
        ];
        let days = due_days_in_month(&tasks, 2024, 6, &Utc);
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 12]);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 1)), 28);
        assert_eq!(days_in_month(date(2024, 12, 31)), 31);
        assert_eq!(days_in_month(date(2024, 4, 30)), 30);
    }

    #[test]
    fn grid_starts_on_sunday() {
        // June 2024 starts on a Saturday
        let grid = month_grid(date(2024, 6, 15));
        assert_eq!(grid[0][6], Some(1));
        assert_eq!(grid[0][5], None);
        assert_eq!(grid[1][0], Some(2));
        let last_week = grid.last().unwrap();
        assert_eq!(last_week[0], Some(30));
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn shifting_days() {
        assert_eq!(shift_days(date(2024, 6, 30), 1), date(2024, 7, 1));
        assert_eq!(shift_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(shift_days(date(2024, 3, 1), -7), date(2024, 2, 23));
    }
}
