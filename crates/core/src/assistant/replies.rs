//! Canned reply templates.

use crate::model::Task;
use crate::queries::{self, Progress};

pub(crate) const MOTIVATION_FIXED: &[&str] = &[
    "Remember: progress, not perfection. Every small step counts toward your goals! 🌟",
    "You're capable of incredible things. Break down big tasks into smaller, manageable steps! 🚀",
    "Success is the sum of small efforts repeated day in and day out. Keep going! ✨",
];

pub(crate) const CHAT_FALLBACKS: &[&str] = &[
    "I'm here to help you stay organized and productive! What specific assistance do you need with your tasks?",
    "Let me help you manage your workload better. Would you like me to analyze your current tasks or provide some productivity tips?",
    "Great question! I can provide insights about your tasks, remind you of deadlines, or offer motivation. What would be most helpful right now?",
    "I'm analyzing your task patterns to provide better assistance. In the meantime, is there anything specific you'd like help with?",
];

pub(crate) const VOICE_FALLBACK: &str = "I didn't understand that command. Try saying \"add task\", \"list tasks\", \"complete task\", or \"show progress\".";

pub(crate) const SUGGESTIONS: &str = "Based on your task patterns, I recommend: 1) Schedule your high-priority tasks during your most productive hours, 2) Break large tasks into smaller, actionable steps, 3) Set up recurring tasks for regular activities. What would you like help with specifically?";

pub(crate) const HELP: &str = "I can help you with: 📋 Task prioritization, ⏰ Deadline reminders, 📈 Progress tracking, 💡 Productivity tips, 🎯 Goal setting. What would you like to explore?";

pub(crate) const CHAT_FOLLOW_UPS: &[&str] = &["Tell me more", "Show task summary", "Give me tips"];

pub const GREETING: &str = "Hello! I'm your AI assistant. I'm here to help you stay productive and motivated. How can I assist you today?";

pub const GREETING_SUGGESTIONS: &[&str] = &[
    "Show my overdue tasks",
    "Suggest task priorities",
    "Give me motivation",
];

pub(crate) const PENDING_PREVIEW: usize = 3;

pub(crate) fn overdue(titles: &str, count: usize) -> String {
    if count == 0 {
        return "Great news! You don't have any overdue tasks. You're staying on top of things! 🎉"
            .to_string();
    }
    format!(
        "You have {count} overdue {}. Let's prioritize: {titles}. I recommend tackling the highest priority ones first!",
        plural(count, "task", "tasks")
    )
}

pub(crate) fn priorities(titles: &str, count: usize) -> String {
    if count == 0 {
        return "You don't have any high-priority tasks right now. Consider reviewing your task list and identifying what needs urgent attention.".to_string();
    }
    format!(
        "Your high-priority tasks are: {titles}. I suggest focusing on these first to make the biggest impact!"
    )
}

/// Four templates: one counts completed tasks, three are fixed.
pub(crate) fn motivation(index: usize, completed: usize) -> String {
    match index {
        0 => format!(
            "You've completed {completed} {} so far - that's amazing progress! 💪",
            plural(completed, "task", "tasks")
        ),
        other => MOTIVATION_FIXED[(other - 1).min(MOTIVATION_FIXED.len() - 1)].to_string(),
    }
}

pub(crate) const MOTIVATION_TEMPLATE_COUNT: usize = 1 + MOTIVATION_FIXED.len();

pub(crate) fn progress(progress: Progress) -> String {
    let tier = if progress.percent >= 75 {
        "Excellent work!"
    } else if progress.percent >= 50 {
        "Good progress, keep it up!"
    } else {
        "You can do this - one task at a time!"
    };
    format!(
        "You're doing great! You've completed {}% of your tasks ({}/{}). {} 📈",
        progress.percent, progress.completed, progress.total, tier
    )
}

pub(crate) fn pending(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "You have no pending tasks. Great job staying on top of everything!".to_string();
    }
    let preview: Vec<&Task> = tasks.iter().take(PENDING_PREVIEW).copied().collect();
    format!(
        "You have {} pending {}. Here are the first few: {}",
        tasks.len(),
        plural(tasks.len(), "task", "tasks"),
        queries::titles(&preview)
    )
}

pub(crate) fn due_today(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "You have no tasks due today. Perfect time to get ahead!".to_string();
    }
    format!(
        "You have {} {} due today: {}",
        tasks.len(),
        plural(tasks.len(), "task", "tasks"),
        queries::titles(tasks)
    )
}

pub(crate) fn task_added(title: &str) -> String {
    format!("Task \"{title}\" has been added to your list.")
}

pub(crate) const ADD_NEEDS_TITLE: &str =
    "Please tell me what the task should be called, for example \"add task review budget\".";

pub(crate) fn task_completed(title: &str) -> String {
    format!("Task \"{title}\" has been marked as complete. Great job!")
}

pub(crate) const TASK_NOT_FOUND: &str =
    "Sorry, I couldn't find that task or it's already completed.";

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
