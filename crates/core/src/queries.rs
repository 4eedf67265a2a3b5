//! Read-only projections over a task snapshot. None of these reorder the snapshot itself.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::clock::Clock;
use crate::model::{Priority, Task};

pub fn overdue(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_overdue(now)).collect()
}

pub fn high_priority_pending(tasks: &[Task]) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| !task.completed && task.priority == Priority::High)
        .collect()
}

pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.completed).collect()
}

pub fn pending(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| !task.completed).collect()
}

pub fn due_on<'a>(tasks: &'a [Task], date: NaiveDate, clock: &dyn Clock) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| clock.local_date(task.due_date) == date)
        .collect()
}

pub fn pending_due_on<'a>(tasks: &'a [Task], date: NaiveDate, clock: &dyn Clock) -> Vec<&'a Task> {
    due_on(tasks, date, clock)
        .into_iter()
        .filter(|task| !task.completed)
        .collect()
}

/// Completed tasks whose due date falls on `date`. Completion time is not tracked,
/// so the due date stands in for it.
pub fn completed_on<'a>(tasks: &'a [Task], date: NaiveDate, clock: &dyn Clock) -> Vec<&'a Task> {
    due_on(tasks, date, clock)
        .into_iter()
        .filter(|task| task.completed)
        .collect()
}

/// Pending tasks due after `now`, soonest first.
pub fn upcoming(tasks: &[Task], now: DateTime<Utc>, limit: usize) -> Vec<&Task> {
    let mut items: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.completed && task.due_date > now)
        .collect();
    items.sort_by_key(|task| task.due_date);
    items.truncate(limit);
    items
}

pub fn titles(tasks: &[&Task]) -> String {
    tasks
        .iter()
        .map(|task| task.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u32,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let percent = if total == 0 {
            0
        } else {
            (completed as f64 * 100.0 / total as f64).round() as u32
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityBreakdown {
    pub fn pending(tasks: &[Task]) -> Self {
        let mut breakdown = Self::default();
        for task in tasks.iter().filter(|task| !task.completed) {
            match task.priority {
                Priority::High => breakdown.high += 1,
                Priority::Medium => breakdown.medium += 1,
                Priority::Low => breakdown.low += 1,
            }
        }
        breakdown
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub progress: Progress,
    pub overdue: usize,
    pub pending_priorities: PriorityBreakdown,
    pub upcoming: Vec<Task>,
}

pub const DASHBOARD_UPCOMING_LIMIT: usize = 5;

impl DashboardSummary {
    pub fn build(tasks: &[Task], now: DateTime<Utc>) -> Self {
        Self {
            progress: Progress::of(tasks),
            overdue: overdue(tasks, now).len(),
            pending_priorities: PriorityBreakdown::pending(tasks),
            upcoming: upcoming(tasks, now, DASHBOARD_UPCOMING_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

/// Month grid, Sunday-first. Leading cells before the 1st are `None`.
#[derive(Debug, Clone)]
pub struct CalendarMonth<'a> {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<CalendarDay<'a>>>,
}

impl<'a> CalendarMonth<'a> {
    pub fn build(tasks: &'a [Task], year: i32, month: u32, clock: &dyn Clock) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let days_in_month = (next_month - first).num_days();
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells: Vec<Option<CalendarDay<'a>>> = vec![None; leading];
        for offset in 0..days_in_month {
            let date = first + Duration::days(offset);
            cells.push(Some(CalendarDay {
                date,
                tasks: due_on(tasks, date, clock),
            }));
        }

        Some(Self { year, month, cells })
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[Option<CalendarDay<'a>>]> {
        self.cells.chunks(7)
    }

    pub fn day(&self, day: u32) -> Option<&CalendarDay<'a>> {
        self.cells
            .iter()
            .flatten()
            .find(|cell| cell.date.day() == day)
    }
}
