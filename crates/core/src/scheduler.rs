//! Periodic reminder and motivation checks.
//!
//! [`NotificationScheduler::tick`] is called once at startup and then on a
//! fixed interval by whoever owns the event loop. Each tick reads one
//! immutable snapshot; the notified set and motivation timestamp live only in
//! the scheduler.

use std::collections::HashSet;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::model::{Task, TaskId};
use crate::notify::{deliver, Notification, NotificationSink};
use crate::queries;
use crate::random::{choose, RandomSource};

const OVERDUE_BODY: &str = "Consider rescheduling or completing this task";

const TIPS: &[&str] = &[
    "🌟 Remember: Small progress is still progress. You got this!",
    "💡 Tip: Break down big tasks into smaller, manageable steps.",
    "🎯 Focus on what matters most. Prioritize your high-impact tasks!",
    "⚡ Take a short break when needed. Your mind deserves rest too!",
];

const CELEBRATION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    pub tick_interval: StdDuration,
    pub approaching_window: Duration,
    pub overdue_window: Duration,
    pub motivation_interval: Duration,
    pub tip_probability: f64,
    pub welcome_delay: StdDuration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: StdDuration::from_secs(60),
            approaching_window: Duration::minutes(30),
            overdue_window: Duration::minutes(60),
            motivation_interval: Duration::hours(2),
            tip_probability: 0.3,
            welcome_delay: StdDuration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    Approaching,
    Overdue,
}

/// `(task, threshold)` pairs that already fired. Thresholds never share keys.
#[derive(Debug, Default, Clone)]
pub struct NotifiedSet {
    fired: HashSet<(TaskId, Threshold)>,
}

impl NotifiedSet {
    pub fn contains(&self, id: TaskId, threshold: Threshold) -> bool {
        self.fired.contains(&(id, threshold))
    }

    pub fn insert(&mut self, id: TaskId, threshold: Threshold) -> bool {
        self.fired.insert((id, threshold))
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motivation {
    Celebration { completed_today: usize },
    Tip,
    Quiet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub approaching: Vec<TaskId>,
    pub overdue: Vec<TaskId>,
    /// `None` when the motivation interval has not elapsed.
    pub motivation: Option<Motivation>,
    pub dropped: usize,
}

impl TickReport {
    pub fn emitted(&self) -> usize {
        let motivation = matches!(
            self.motivation,
            Some(Motivation::Celebration { .. }) | Some(Motivation::Tip)
        );
        self.approaching.len() + self.overdue.len() + usize::from(motivation) - self.dropped
    }
}

#[derive(Debug, Default)]
pub struct NotificationScheduler {
    config: SchedulerConfig,
    notified: NotifiedSet,
    last_motivation: Option<DateTime<Utc>>,
}

impl NotificationScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            notified: NotifiedSet::default(),
            last_motivation: None,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn notified(&self) -> &NotifiedSet {
        &self.notified
    }

    pub fn tick(
        &mut self,
        tasks: &[Task],
        clock: &dyn Clock,
        random: &mut dyn RandomSource,
        sink: &mut dyn NotificationSink,
    ) -> TickReport {
        let now = clock.now();
        let mut report = TickReport::default();

        for task in tasks.iter().filter(|task| !task.completed) {
            let remaining = task.due_date - now;

            if remaining > Duration::zero()
                && remaining <= self.config.approaching_window
                && self.notified.insert(task.id, Threshold::Approaching)
            {
                report.approaching.push(task.id);
                if !deliver(sink, approaching(task, self.config.approaching_window)) {
                    report.dropped += 1;
                }
            }

            let elapsed = -remaining;
            if elapsed > Duration::zero()
                && elapsed <= self.config.overdue_window
                && self.notified.insert(task.id, Threshold::Overdue)
            {
                report.overdue.push(task.id);
                if !deliver(sink, overdue(task, elapsed)) {
                    report.dropped += 1;
                }
            }
        }

        let due_for_motivation = self
            .last_motivation
            .map_or(true, |last| now - last > self.config.motivation_interval);
        if due_for_motivation {
            let motivation = self.motivate(tasks, clock, random);
            if let Some(notification) = motivation_notification(motivation, random) {
                if !deliver(sink, notification) {
                    report.dropped += 1;
                }
            }
            self.last_motivation = Some(now);
            report.motivation = Some(motivation);
        }

        tracing::debug!(
            approaching = report.approaching.len(),
            overdue = report.overdue.len(),
            motivation = ?report.motivation,
            dropped = report.dropped,
            "scheduler tick"
        );
        report
    }

    fn motivate(
        &self,
        tasks: &[Task],
        clock: &dyn Clock,
        random: &mut dyn RandomSource,
    ) -> Motivation {
        let completed_today = queries::completed_on(tasks, clock.today(), clock).len();
        if completed_today > 0 {
            Motivation::Celebration { completed_today }
        } else if random.chance(self.config.tip_probability) {
            Motivation::Tip
        } else {
            Motivation::Quiet
        }
    }
}

/// The reminder names the configured window, not the exact time left.
fn approaching(task: &Task, window: Duration) -> Notification {
    Notification::info(format!(
        "⏰ Reminder: \"{}\" is due in {} minutes!",
        task.title,
        window.num_minutes()
    ))
    .with_body(task.description.clone())
    .with_action("View")
}

fn overdue(task: &Task, elapsed: Duration) -> Notification {
    Notification::error(format!(
        "🚨 Overdue: \"{}\" was due {} minutes ago",
        task.title,
        elapsed.num_minutes()
    ))
    .with_body(OVERDUE_BODY)
}

fn motivation_notification(
    motivation: Motivation,
    random: &mut dyn RandomSource,
) -> Option<Notification> {
    match motivation {
        Motivation::Celebration { completed_today } => {
            let title = celebration(random.pick(CELEBRATION_COUNT), completed_today);
            Some(Notification::success(title).with_action("Thanks!"))
        }
        Motivation::Tip => Some(Notification::plain(choose(random, TIPS))),
        Motivation::Quiet => None,
    }
}

fn celebration(index: usize, count: usize) -> String {
    match index {
        0 => format!("🎉 Amazing! You've completed {count} tasks today. Keep up the great work!"),
        1 => format!("💪 You're on fire! {count} tasks done today. Your productivity is inspiring!"),
        2 => format!("⭐ Fantastic progress! {count} tasks completed. You're crushing your goals!"),
        _ => format!("🚀 Excellent work! {count} tasks finished today. You're unstoppable!"),
    }
}
