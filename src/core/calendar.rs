//! Month calendar grid for the planner dashboard.
//!
//! The grid is a list of complete weeks starting on [`FIRST_WEEKDAY`], padded
//! with the trailing days of the previous month and the leading days of the
//! next one. Each cell knows whether it is in the selected month, whether it
//! is today or the selected date, and how many distinct tasks start or are due
//! on it.

use crate::{
    core::time::Clock,
    entities::{Task, task},
    errors::Result,
};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Weeks start on Sunday
pub const FIRST_WEEKDAY: Weekday = Weekday::Sun;

/// Short weekday labels, Sunday first
const WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// One day of the calendar grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    /// The calendar date
    pub date: NaiveDate,
    /// Whether the date belongs to the selected month
    pub in_month: bool,
    /// Whether the date is today's local date
    pub is_today: bool,
    /// Whether the date is the selected date
    pub is_selected: bool,
    /// Number of distinct tasks starting or due on this date
    pub task_count: usize,
}

/// Calendar grid plus navigation anchors
#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    /// Rows of exactly seven cells
    pub weeks: Vec<Vec<DayCell>>,
    /// Column labels, starting at [`FIRST_WEEKDAY`]
    pub weekdays: Vec<&'static str>,
    /// First day of the previous month
    pub prev_month: NaiveDate,
    /// First day of the next month
    pub next_month: NaiveDate,
}

/// First and last day of the month containing `date`, plus the first days of
/// the adjacent months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAnchors {
    /// Day 1 of the month
    pub first: NaiveDate,
    /// Last day of the month
    pub last: NaiveDate,
    /// Day 1 of the previous month
    pub prev: NaiveDate,
    /// Day 1 of the next month
    pub next: NaiveDate,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Computes the month anchors for `date`.
///
/// Adding 32 days to day 1 always lands in the next month; stepping one day
/// back from day 1 always lands in the previous one.
#[must_use]
pub fn month_anchors(date: NaiveDate) -> MonthAnchors {
    let first = first_of_month(date);
    let next = first_of_month(first + Days::new(32));
    let prev = first_of_month(first - Days::new(1));
    let days_in_month = (next - first).num_days().unsigned_abs();
    MonthAnchors {
        first,
        last: first + Days::new(days_in_month - 1),
        prev,
        next,
    }
}

fn days_from_week_start(date: NaiveDate, first_weekday: Weekday) -> u64 {
    let offset = 7 + date.weekday().num_days_from_monday() - first_weekday.num_days_from_monday();
    u64::from(offset % 7)
}

/// Dates of the display grid for the month containing `date`, week by week.
#[must_use]
pub fn month_dates(date: NaiveDate, first_weekday: Weekday) -> Vec<[NaiveDate; 7]> {
    let anchors = month_anchors(date);
    let grid_start = anchors.first - Days::new(days_from_week_start(anchors.first, first_weekday));
    let grid_end = anchors.last + Days::new(6 - days_from_week_start(anchors.last, first_weekday));

    let mut weeks = Vec::new();
    let mut week_start = grid_start;
    while week_start <= grid_end {
        let mut week = [week_start; 7];
        for (offset, day) in (0u64..).zip(week.iter_mut()) {
            *day = week_start + Days::new(offset);
        }
        weeks.push(week);
        week_start = week_start + Days::new(7);
    }
    weeks
}

/// Weekday labels starting at `first_weekday`.
#[must_use]
pub fn weekday_labels(first_weekday: Weekday) -> Vec<&'static str> {
    let start = first_weekday.num_days_from_sunday() as usize;
    (0..7).map(|i| WEEKDAY_LABELS[(start + i) % 7]).collect()
}

/// Builds the grid from pre-bucketed task ids.
#[must_use]
pub fn build_calendar(
    selected: NaiveDate,
    today: NaiveDate,
    tasks_by_day: &HashMap<NaiveDate, HashSet<i64>>,
) -> CalendarMonth {
    let anchors = month_anchors(selected);
    let weeks = month_dates(selected, FIRST_WEEKDAY)
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|date| DayCell {
                    date,
                    in_month: date.month() == selected.month() && date.year() == selected.year(),
                    is_today: date == today,
                    is_selected: date == selected,
                    task_count: tasks_by_day.get(&date).map_or(0, HashSet::len),
                })
                .collect()
        })
        .collect();

    CalendarMonth {
        weeks,
        weekdays: weekday_labels(FIRST_WEEKDAY),
        prev_month: anchors.prev,
        next_month: anchors.next,
    }
}

/// Buckets task ids by the local dates of their start and due timestamps,
/// keeping only dates between `first` and `last`.
///
/// A task whose start and due fall on different days counts on both; a task
/// with neither timestamp counts nowhere.
#[must_use]
pub fn bucket_tasks_by_day(
    clock: &Clock,
    tasks: &[(i64, Option<DateTimeUtc>, Option<DateTimeUtc>)],
    first: NaiveDate,
    last: NaiveDate,
) -> HashMap<NaiveDate, HashSet<i64>> {
    let mut tasks_by_day: HashMap<NaiveDate, HashSet<i64>> = HashMap::new();
    for &(task_id, start_at, due_at) in tasks {
        for local in [start_at, due_at].into_iter().filter_map(|t| clock.localize_opt(t)) {
            let day = local.date_naive();
            if (first..=last).contains(&day) {
                tasks_by_day.entry(day).or_default().insert(task_id);
            }
        }
    }
    tasks_by_day
}

/// Loads the owner's tasks for the selected month and builds the calendar.
///
/// Only the id and the two timestamps are fetched.
pub async fn load_calendar(
    db: &DatabaseConnection,
    clock: &Clock,
    owner_id: i64,
    selected: NaiveDate,
) -> Result<CalendarMonth> {
    let anchors = month_anchors(selected);
    let (month_start, month_end) = clock.range_bounds(anchors.first, anchors.last);

    let monthly_tasks: Vec<(i64, Option<DateTimeUtc>, Option<DateTimeUtc>)> = Task::find()
        .select_only()
        .column(task::Column::Id)
        .column(task::Column::StartAt)
        .column(task::Column::DueAt)
        .filter(task::Column::OwnerId.eq(owner_id))
        .filter(
            Condition::any()
                .add(task::Column::StartAt.between(month_start, month_end))
                .add(task::Column::DueAt.between(month_start, month_end)),
        )
        .order_by_asc(task::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    tracing::debug!(
        owner_id,
        month = %anchors.first,
        tasks = monthly_tasks.len(),
        "Loaded tasks for calendar"
    );

    let tasks_by_day = bucket_tasks_by_day(clock, &monthly_tasks, anchors.first, anchors.last);
    Ok(build_calendar(selected, clock.today(), &tasks_by_day))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_anchors() {
        let anchors = month_anchors(date(2024, 1, 31));
        assert_eq!(anchors.first, date(2024, 1, 1));
        assert_eq!(anchors.last, date(2024, 1, 31));
        assert_eq!(anchors.prev, date(2023, 12, 1));
        assert_eq!(anchors.next, date(2024, 2, 1));

        let leap = month_anchors(date(2024, 2, 10));
        assert_eq!(leap.last, date(2024, 2, 29));

        let december = month_anchors(date(2024, 12, 25));
        assert_eq!(december.next, date(2025, 1, 1));
        assert_eq!(december.prev, date(2024, 11, 1));
    }

    #[test]
    fn test_grid_is_complete_sunday_first_weeks() {
        for month in 1..=12 {
            let weeks = month_dates(date(2024, month, 15), Weekday::Sun);
            assert!((4..=6).contains(&weeks.len()));
            for week in &weeks {
                assert_eq!(week[0].weekday(), Weekday::Sun);
                assert_eq!(week[6].weekday(), Weekday::Sat);
            }
            let first = date(2024, month, 1);
            assert!(weeks.iter().flatten().any(|d| *d == first));
        }
    }

    #[test]
    fn test_grid_pads_with_adjacent_months() {
        // March 2024 starts on a Friday and ends on a Sunday
        let weeks = month_dates(date(2024, 3, 5), Weekday::Sun);
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][0], date(2024, 2, 25));
        assert_eq!(weeks[0][5], date(2024, 3, 1));
        assert_eq!(weeks[5][0], date(2024, 3, 31));
        assert_eq!(weeks[5][6], date(2024, 4, 6));
    }

    #[test]
    fn test_february_starting_on_sunday_fills_four_weeks() {
        let weeks = month_dates(date(2015, 2, 1), Weekday::Sun);
        assert_eq!(weeks.len(), 4);
    }

    #[test]
    fn test_weekday_labels_rotate() {
        assert_eq!(weekday_labels(Weekday::Sun)[0], "일");
        assert_eq!(weekday_labels(Weekday::Mon), vec!["월", "화", "수", "목", "금", "토", "일"]);
    }

    #[test]
    fn test_build_calendar_flags() {
        let selected = date(2024, 3, 5);
        let today = date(2024, 3, 18);
        let mut tasks_by_day = HashMap::new();
        tasks_by_day.insert(date(2024, 3, 5), HashSet::from([1, 2]));

        let calendar = build_calendar(selected, today, &tasks_by_day);
        let cells: Vec<&DayCell> = calendar.weeks.iter().flatten().collect();

        assert_eq!(cells.len() % 7, 0);
        assert_eq!(cells.iter().filter(|c| c.is_selected).count(), 1);
        assert_eq!(cells.iter().filter(|c| c.is_today).count(), 1);
        let selected_cell = cells.iter().find(|c| c.is_selected).unwrap();
        assert_eq!(selected_cell.date, selected);
        assert_eq!(selected_cell.task_count, 2);
        assert!(!cells[0].in_month);
        assert_eq!(calendar.prev_month, date(2024, 2, 1));
        assert_eq!(calendar.next_month, date(2024, 4, 1));
        assert_eq!(calendar.weekdays.len(), 7);
    }

    #[test]
    fn test_bucket_counts_start_and_due_days() {
        let clock = Clock::system(chrono_tz::Asia::Seoul);
        // Start 2024-03-05 10:00 KST, due 2024-03-07 09:00 KST
        let start = Utc.with_ymd_and_hms(2024, 3, 5, 1, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
        // Same-day start and due count once
        let same_day = Utc.with_ymd_and_hms(2024, 3, 5, 2, 0, 0).unwrap();
        let tasks = vec![
            (1, Some(start), Some(due)),
            (2, Some(same_day), Some(same_day)),
            (3, None, None),
        ];

        let buckets = bucket_tasks_by_day(&clock, &tasks, date(2024, 3, 1), date(2024, 3, 31));
        assert_eq!(buckets[&date(2024, 3, 5)], HashSet::from([1, 2]));
        assert_eq!(buckets[&date(2024, 3, 7)], HashSet::from([1]));
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_bucket_uses_local_date() {
        let clock = Clock::system(chrono_tz::Asia::Seoul);
        // 2024-02-29 16:00 UTC is 2024-03-01 01:00 in Seoul
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 16, 0, 0).unwrap();
        let buckets =
            bucket_tasks_by_day(&clock, &[(7, Some(start), None)], date(2024, 3, 1), date(2024, 3, 31));
        assert!(buckets[&date(2024, 3, 1)].contains(&7));
    }

    #[tokio::test]
    async fn test_load_calendar_counts_owner_tasks() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let clock = test_clock();
        let owner = create_test_user(&db, "alice").await?;
        let other = create_test_user(&db, "bob").await?;

        let start = local(2024, 3, 5, 9, 0);
        let due = local(2024, 3, 8, 18, 0);
        create_scheduled_task(&db, owner.id, "Trip", Some(start), Some(due)).await?;
        create_scheduled_task(&db, owner.id, "Dentist", Some(local(2024, 3, 5, 15, 0)), None)
            .await?;
        // Outside the month
        create_scheduled_task(&db, owner.id, "April", Some(local(2024, 4, 2, 9, 0)), None).await?;
        // Someone else's task on the same day
        create_scheduled_task(&db, other.id, "Not mine", Some(local(2024, 3, 5, 9, 0)), None)
            .await?;

        let calendar = load_calendar(&db, &clock, owner.id, date(2024, 3, 5)).await?;
        let count_on = |d: NaiveDate| {
            calendar
                .weeks
                .iter()
                .flatten()
                .find(|c| c.date == d)
                .map(|c| c.task_count)
                .unwrap()
        };

        assert_eq!(count_on(date(2024, 3, 5)), 2);
        assert_eq!(count_on(date(2024, 3, 8)), 1);
        assert_eq!(count_on(date(2024, 3, 6)), 0);
        // April 2 is shown as padding but is outside the month
        assert_eq!(count_on(date(2024, 4, 2)), 0);
        Ok(())
    }
}
