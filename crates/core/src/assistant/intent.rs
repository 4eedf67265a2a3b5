//! Ordered substring patterns shared by the chat and voice surfaces.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which surface the utterance came from. Only voice accepts imperative commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Chat,
    Voice,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Chat => "chat",
            Surface::Voice => "voice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Overdue,
    Priorities,
    Motivation,
    Progress,
    Suggestions,
    Help,
    PendingList,
    DueToday,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask { title: String },
    CompleteTask { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Query(Query),
    Command(Command),
    Unrecognized,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Query(Query::Overdue) => "query_overdue",
            Intent::Query(Query::Priorities) => "query_priorities",
            Intent::Query(Query::Motivation) => "query_motivation",
            Intent::Query(Query::Progress) => "query_progress",
            Intent::Query(Query::Suggestions) => "query_suggestions",
            Intent::Query(Query::Help) => "query_help",
            Intent::Query(Query::PendingList) => "query_pending",
            Intent::Query(Query::DueToday) => "query_today",
            Intent::Command(Command::AddTask { .. }) => "command_add",
            Intent::Command(Command::CompleteTask { .. }) => "command_complete",
            Intent::Unrecognized => "unrecognized",
        }
    }
}

/// First match wins; order is significant.
const QUERY_PATTERNS: &[(Query, &[&str])] = &[
    (Query::Overdue, &["overdue", "late tasks"]),
    (Query::Priorities, &["priorit"]),
    (Query::Motivation, &["motivat"]),
    (Query::Progress, &["progress", "how am i doing"]),
    (Query::Suggestions, &["suggest", "recommend"]),
    (Query::Help, &["help"]),
    (
        Query::PendingList,
        &["list tasks", "show tasks", "what are my tasks"],
    ),
    (Query::DueToday, &["today"]),
];

static ADD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:add|create) task\s*(.*)$").expect("valid regex"));
static COMPLETE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:complete task|mark complete)\s*(.*)$").expect("valid regex")
});

pub fn classify(utterance: &str, surface: Surface) -> Intent {
    let lower = utterance.trim().to_lowercase();
    if lower.is_empty() {
        return Intent::Unrecognized;
    }

    if surface == Surface::Voice {
        if let Some(command) = match_command(&lower) {
            return Intent::Command(command);
        }
    }

    QUERY_PATTERNS
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(query, _)| Intent::Query(*query))
        .unwrap_or(Intent::Unrecognized)
}

fn match_command(lower: &str) -> Option<Command> {
    if let Some(caps) = ADD_RE.captures(lower) {
        let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        return Some(Command::AddTask {
            title: title.to_string(),
        });
    }
    if let Some(caps) = COMPLETE_RE.captures(lower) {
        let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        return Some(Command::CompleteTask {
            name: name.to_string(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Show my overdue tasks", Intent::Query(Query::Overdue))]
    #[case("any LATE TASKS?", Intent::Query(Query::Overdue))]
    #[case("Suggest task priorities", Intent::Query(Query::Priorities))]
    #[case("what's the priority", Intent::Query(Query::Priorities))]
    #[case("Give me motivation", Intent::Query(Query::Motivation))]
    #[case("How am I doing?", Intent::Query(Query::Progress))]
    #[case("show progress", Intent::Query(Query::Progress))]
    #[case("can you recommend something", Intent::Query(Query::Suggestions))]
    #[case("help", Intent::Query(Query::Help))]
    #[case("list tasks", Intent::Query(Query::PendingList))]
    #[case("what's due today", Intent::Query(Query::DueToday))]
    #[case("hello there", Intent::Unrecognized)]
    #[case("   ", Intent::Unrecognized)]
    fn chat_patterns_follow_declaration_order(#[case] utterance: &str, #[case] expected: Intent) {
        assert_eq!(classify(utterance, Surface::Chat), expected);
    }

    #[test]
    fn overdue_wins_over_later_patterns() {
        assert_eq!(
            classify("help me with overdue progress", Surface::Chat),
            Intent::Query(Query::Overdue)
        );
    }

    #[test]
    fn chat_ignores_imperative_commands() {
        assert_eq!(classify("add task buy milk", Surface::Chat), Intent::Unrecognized);
    }

    #[rstest]
    #[case("add task buy milk", Command::AddTask { title: "buy milk".into() })]
    #[case("Create Task  Call Mom ", Command::AddTask { title: "call mom".into() })]
    #[case("add task", Command::AddTask { title: String::new() })]
    #[case("complete task review", Command::CompleteTask { name: "review".into() })]
    #[case("mark complete team meeting", Command::CompleteTask { name: "team meeting".into() })]
    fn voice_matches_commands_before_queries(#[case] utterance: &str, #[case] expected: Command) {
        assert_eq!(
            classify(utterance, Surface::Voice),
            Intent::Command(expected)
        );
    }

    #[test]
    fn voice_falls_through_to_shared_queries() {
        assert_eq!(
            classify("how am i doing", Surface::Voice),
            Intent::Query(Query::Progress)
        );
        assert_eq!(
            classify("complete the overdue report", Surface::Voice),
            Intent::Query(Query::Overdue)
        );
    }
}
