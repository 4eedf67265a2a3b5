use std::path::PathBuf;

use clap::{value_parser, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskmuse",
    version,
    about = "A task manager with a rule-based assistant, voice commands and reminders.",
    after_help = "Examples:\n  taskmuse                      Start the interactive shell (same as `taskmuse shell`)\n  taskmuse ask how am I doing\n  taskmuse calendar --month 2025-06\n  taskmuse login --email ada@example.com"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter written to stderr (e.g. "warn", "debug", "taskmuse_core=trace")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Start the interactive shell (default command)
    Shell(ShellArgs),
    /// Ask the assistant one question about the starter tasks
    Ask(AskArgs),
    /// Print the dashboard summary
    Dashboard,
    /// Print a month calendar with due tasks
    Calendar(CalendarArgs),
    /// Sign in locally (no password check)
    Login(LoginArgs),
    /// Forget the signed-in user
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ShellArgs {
    /// Seconds between reminder checks
    #[arg(long = "tick-seconds", value_name = "SECONDS", value_parser = value_parser!(u64).range(1..))]
    pub tick_seconds: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question, e.g. "what is overdue"
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CalendarArgs {
    /// Month to show as YYYY-MM (defaults to the current month)
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    /// Display name (defaults to the part of the email before '@')
    #[arg(long)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::parse_from(["taskmuse"]);
        assert!(cli.command.is_none());
        assert!(cli.log_filter.is_none());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::parse_from([
            "taskmuse",
            "ask",
            "how",
            "am",
            "i",
            "doing",
            "--log",
            "debug",
            "--data-dir",
            "/tmp/tm",
        ]);
        assert_eq!(cli.log_filter.as_deref(), Some("debug"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tm")));
        match cli.command {
            Some(CliCommand::Ask(args)) => assert_eq!(args.text.join(" "), "how am i doing"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn tick_seconds_must_be_positive() {
        assert!(Cli::try_parse_from(["taskmuse", "shell", "--tick-seconds", "0"]).is_err());
        let cli = Cli::parse_from(["taskmuse", "shell", "--tick-seconds", "5"]);
        match cli.command {
            Some(CliCommand::Shell(args)) => assert_eq!(args.tick_seconds, Some(5)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
