//! Plain-text rendering shared by one-shot commands and the interactive shell.

use std::io::{self, Write};

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use taskmuse_core::chat::{ChatMessage, Sender};
use taskmuse_core::queries::{CalendarMonth, DashboardSummary};
use taskmuse_core::{Notification, Task, TaskFilter, UserProfile};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn format_due(due: DateTime<Utc>) -> String {
    due.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn task_line(task: &Task, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "[{}] #{} {} ({}, {}, due {})",
        if task.completed { "x" } else { " " },
        task.id,
        task.title,
        task.priority,
        task.category,
        format_due(task.due_date)
    );
    if let Some(recurrence) = task.recurrence {
        line.push_str(&format!(" every {recurrence}"));
    }
    if task.is_overdue(now) {
        line.push_str(" OVERDUE");
    }
    line
}

/// Rebuild the inline-token form of a task, ready to be edited and sent back through `/edit`.
pub fn compose_task_capture(task: &Task) -> String {
    let mut components = vec![task.title.clone()];
    if !task.category.is_empty() {
        components.push(format!("#{}", task.category));
    }
    components.push(format!("p:{}", task.priority));
    components.push(format!(
        "due:{}",
        task.due_date.with_timezone(&Local).format("%Y-%m-%dT%H:%M")
    ));
    if let Some(recurrence) = task.recurrence {
        components.push(format!("every:{recurrence}"));
    }
    components.join(" ")
}

pub fn write_tasks<W: Write>(
    mut writer: W,
    tasks: &[Task],
    filter: TaskFilter,
    now: DateTime<Utc>,
) -> io::Result<()> {
    let visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();
    writeln!(writer, "Tasks ({}): {}", filter_label(filter), visible.len())?;
    if visible.is_empty() {
        writeln!(writer, "  Nothing here yet. Add one with /add <title>")?;
    }
    for task in visible {
        writeln!(writer, "  {}", task_line(task, now))?;
    }
    Ok(())
}

fn filter_label(filter: TaskFilter) -> &'static str {
    match filter {
        TaskFilter::All => "all",
        TaskFilter::Pending => "pending",
        TaskFilter::Completed => "completed",
    }
}

pub fn write_dashboard<W: Write>(
    mut writer: W,
    summary: &DashboardSummary,
    due_today: usize,
) -> io::Result<()> {
    let progress = summary.progress;
    writeln!(writer, "Dashboard")?;
    writeln!(
        writer,
        "  Completed: {}/{} ({}%)",
        progress.completed, progress.total, progress.percent
    )?;
    writeln!(writer, "  Due today: {due_today}")?;
    writeln!(writer, "  Overdue:   {}", summary.overdue)?;
    let priorities = summary.pending_priorities;
    writeln!(
        writer,
        "  Pending by priority: high {}, medium {}, low {}",
        priorities.high, priorities.medium, priorities.low
    )?;
    if summary.upcoming.is_empty() {
        writeln!(writer, "  Upcoming: none")?;
    } else {
        writeln!(writer, "  Upcoming:")?;
        for task in &summary.upcoming {
            writeln!(
                writer,
                "    {} ({}, due {})",
                task.title,
                task.priority,
                format_due(task.due_date)
            )?;
        }
    }
    Ok(())
}

pub fn write_calendar<W: Write>(
    mut writer: W,
    month: &CalendarMonth<'_>,
    today: NaiveDate,
) -> io::Result<()> {
    let name = MONTHS
        .get(month.month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    writeln!(writer, "{name} {}", month.year)?;
    writeln!(writer, " Su  Mo  Tu  We  Th  Fr  Sa")?;
    for week in month.weeks() {
        let mut row = String::new();
        for cell in week {
            match cell {
                None => row.push_str("    "),
                Some(day) => {
                    let marker = if day.date == today {
                        '<'
                    } else if day.tasks.is_empty() {
                        ' '
                    } else {
                        '*'
                    };
                    row.push_str(&format!("{:>3}{marker}", day.date.day()));
                }
            }
        }
        writeln!(writer, "{}", row.trim_end())?;
    }

    let busy: Vec<_> = month
        .cells
        .iter()
        .flatten()
        .filter(|day| !day.tasks.is_empty())
        .collect();
    for day in busy {
        let titles: Vec<String> = day
            .tasks
            .iter()
            .map(|task| {
                if task.completed {
                    format!("{} (done)", task.title)
                } else {
                    task.title.clone()
                }
            })
            .collect();
        writeln!(writer, "  {}: {}", day.date.format("%b %d"), titles.join(", "))?;
    }
    Ok(())
}

pub fn notification_lines(notification: &Notification) -> Vec<String> {
    let mut lines = vec![format!("🔔 [{}] {}", notification.kind, notification.title)];
    if let Some(body) = &notification.body {
        lines.push(format!("    {body}"));
    }
    if let Some(action) = &notification.action_label {
        lines.push(format!("    ({action})"));
    }
    lines
}

pub fn chat_lines(message: &ChatMessage) -> Vec<String> {
    let prefix = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "🤖",
    };
    let mut lines = vec![format!("{prefix} > {}", message.text)];
    if !message.suggestions.is_empty() {
        lines.push(format!("    try: {}", message.suggestions.join(" | ")));
    }
    lines
}

pub fn write_user<W: Write>(mut writer: W, user: Option<&UserProfile>) -> io::Result<()> {
    match user {
        Some(user) => writeln!(writer, "Signed in as {} <{}>", user.name, user.email),
        None => writeln!(writer, "Not signed in"),
    }
}
