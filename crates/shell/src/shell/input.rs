use taskmuse_core::{TaskFilter, TaskId};

use crate::commands::parse_month;

pub const COMMAND_HELP: &str = concat!(
    "Commands: /tasks [all|pending|completed], /add <text>, /edit <id> [text], ",
    "/toggle <id>, /delete <id>, /dashboard, /calendar [YYYY-MM], /listen, /stop, ",
    "/help, /quit. Anything else is sent to the assistant.\n",
    "Tokens for /add and /edit: #category, p:high|medium|low, due:<date>, every:<daily|weekly|monthly|yearly>"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Blank,
    /// Free text for the chat panel, or for the voice session while it listens.
    Text(String),
    Tasks(TaskFilter),
    Add(String),
    Edit { id: TaskId, text: Option<String> },
    Toggle(TaskId),
    Delete(TaskId),
    Dashboard,
    Calendar(Option<(i32, u32)>),
    Listen,
    Stop,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ShellInput {
    let raw = line.trim();
    if raw.is_empty() {
        return ShellInput::Blank;
    }
    let Some(command) = raw.strip_prefix('/') else {
        return ShellInput::Text(raw.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest = parts.next().map(str::trim).unwrap_or_default();

    match name.as_str() {
        "" => ShellInput::Invalid("Enter a command after '/'".into()),
        "help" | "h" => ShellInput::Help,
        "quit" | "q" | "exit" => ShellInput::Quit,
        "dashboard" | "dash" => ShellInput::Dashboard,
        "listen" | "mic" => ShellInput::Listen,
        "stop" => ShellInput::Stop,
        "tasks" | "list" | "ls" => match rest.parse::<TaskFilter>() {
            Ok(filter) => ShellInput::Tasks(filter),
            Err(err) => ShellInput::Invalid(err.to_string()),
        },
        "add" => {
            if rest.is_empty() {
                ShellInput::Invalid("Usage: /add <task description>".into())
            } else {
                ShellInput::Add(rest.to_string())
            }
        }
        "edit" => {
            let mut pieces = rest.splitn(2, char::is_whitespace);
            match pieces.next().map(parse_id) {
                Some(Ok(id)) => ShellInput::Edit {
                    id,
                    text: pieces
                        .next()
                        .map(str::trim)
                        .filter(|text| !text.is_empty())
                        .map(str::to_string),
                },
                Some(Err(message)) => ShellInput::Invalid(message),
                None => ShellInput::Invalid("Usage: /edit <id> [text]".into()),
            }
        }
        "toggle" | "done" => id_command(rest, "/toggle", ShellInput::Toggle),
        "delete" | "del" | "rm" => id_command(rest, "/delete", ShellInput::Delete),
        "calendar" | "cal" => {
            if rest.is_empty() {
                ShellInput::Calendar(None)
            } else {
                match parse_month(rest) {
                    Ok(month) => ShellInput::Calendar(Some(month)),
                    Err(err) => ShellInput::Invalid(err.to_string()),
                }
            }
        }
        other => ShellInput::Invalid(format!("Unknown command '/{other}'. Try /help")),
    }
}

fn id_command(rest: &str, usage: &str, build: fn(TaskId) -> ShellInput) -> ShellInput {
    if rest.is_empty() {
        return ShellInput::Invalid(format!("Usage: {usage} <id>"));
    }
    match parse_id(rest) {
        Ok(id) => build(id),
        Err(message) => ShellInput::Invalid(message),
    }
}

fn parse_id(raw: &str) -> Result<TaskId, String> {
    raw.parse::<TaskId>()
        .map_err(|_| format!("'{raw}' is not a task id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", ShellInput::Blank)]
    #[case("  how am I doing ", ShellInput::Text("how am I doing".into()))]
    #[case("/tasks", ShellInput::Tasks(TaskFilter::All))]
    #[case("/ls done", ShellInput::Tasks(TaskFilter::Completed))]
    #[case("/add Pay rent due:+2d p:high", ShellInput::Add("Pay rent due:+2d p:high".into()))]
    #[case("/edit 3", ShellInput::Edit { id: TaskId(3), text: None })]
    #[case("/edit #3 New title #home", ShellInput::Edit { id: TaskId(3), text: Some("New title #home".into()) })]
    #[case("/toggle 1700000000000", ShellInput::Toggle(TaskId(1_700_000_000_000)))]
    #[case("/rm 2", ShellInput::Delete(TaskId(2)))]
    #[case("/cal 2025-02", ShellInput::Calendar(Some((2025, 2))))]
    #[case("/calendar", ShellInput::Calendar(None))]
    #[case("/LISTEN", ShellInput::Listen)]
    #[case("/stop", ShellInput::Stop)]
    #[case("/q", ShellInput::Quit)]
    fn parses_shell_lines(#[case] line: &str, #[case] expected: ShellInput) {
        assert_eq!(parse_line(line), expected);
    }

    #[rstest]
    #[case("/")]
    #[case("/add")]
    #[case("/toggle")]
    #[case("/delete abc")]
    #[case("/tasks someday")]
    #[case("/calendar june")]
    #[case("/frobnicate")]
    fn rejects_malformed_commands(#[case] line: &str) {
        assert!(matches!(parse_line(line), ShellInput::Invalid(_)));
    }
}
