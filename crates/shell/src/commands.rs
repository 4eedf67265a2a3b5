use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};
use taskmuse_core::queries::{self, CalendarMonth, DashboardSummary};
use taskmuse_core::seeding::seed_tasks;
use taskmuse_core::{
    Assistant, Clock, Preferences, RandomSource, StdRandom, SystemClock, TaskStore, TasksService,
};

use crate::cli::{AskArgs, CalendarArgs, CliCommand, LoginArgs};
use crate::config::AppConfig;
use crate::render;

/// Clock and randomness for one-shot commands, injectable for tests.
pub struct CommandEnv {
    pub clock: Arc<dyn Clock>,
    pub random: Box<dyn RandomSource>,
}

impl CommandEnv {
    pub fn system() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            random: Box::new(StdRandom::from_entropy()),
        }
    }
}

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, writer: W) -> Result<()> {
    execute_with(config, command, CommandEnv::system(), writer)
}

pub fn execute_with<W: Write>(
    config: &AppConfig,
    command: CliCommand,
    env: CommandEnv,
    mut writer: W,
) -> Result<()> {
    match command {
        CliCommand::Ask(args) => handle_ask(&args, env, &mut writer),
        CliCommand::Dashboard => handle_dashboard(env, &mut writer),
        CliCommand::Calendar(args) => handle_calendar(&args, env, &mut writer),
        CliCommand::Login(args) => handle_login(config, &args, env, &mut writer),
        CliCommand::Logout => handle_logout(config, &mut writer),
        CliCommand::Whoami => {
            let prefs = Preferences::load(config.preferences_path());
            render::write_user(&mut writer, prefs.current_user().as_ref())?;
            Ok(())
        }
        CliCommand::Shell(_) => Err(anyhow!("launch the interactive shell directly")),
    }
}

fn starter_service(clock: &Arc<dyn Clock>) -> TasksService {
    TasksService::new(TaskStore::new(seed_tasks(clock.now())), clock.clone())
}

fn handle_ask<W: Write>(args: &AskArgs, env: CommandEnv, mut writer: W) -> Result<()> {
    let service = starter_service(&env.clock);
    let mut assistant = Assistant::new(env.clock, env.random);
    let response = assistant.respond(&args.text.join(" "), &service.snapshot());
    writeln!(writer, "{}", response.text)?;
    if let Some(follow_ups) = response.suggested_follow_ups {
        writeln!(writer, "  try: {}", follow_ups.join(" | "))?;
    }
    Ok(())
}

fn handle_dashboard<W: Write>(env: CommandEnv, writer: W) -> Result<()> {
    let service = starter_service(&env.clock);
    let snapshot = service.snapshot();
    let summary = DashboardSummary::build(&snapshot, env.clock.now());
    let due_today = queries::due_on(&snapshot, env.clock.today(), env.clock.as_ref()).len();
    render::write_dashboard(writer, &summary, due_today)?;
    Ok(())
}

fn handle_calendar<W: Write>(args: &CalendarArgs, env: CommandEnv, writer: W) -> Result<()> {
    let today = env.clock.today();
    let (year, month) = match &args.month {
        Some(raw) => parse_month(raw)?,
        None => (today.year(), today.month()),
    };
    let service = starter_service(&env.clock);
    let snapshot = service.snapshot();
    let calendar = CalendarMonth::build(&snapshot, year, month, env.clock.as_ref())
        .ok_or_else(|| anyhow!("invalid month {year}-{month:02}"))?;
    render::write_calendar(writer, &calendar, today)?;
    Ok(())
}

fn handle_login<W: Write>(
    config: &AppConfig,
    args: &LoginArgs,
    env: CommandEnv,
    mut writer: W,
) -> Result<()> {
    if !args.email.contains('@') {
        return Err(anyhow!("'{}' does not look like an email address", args.email));
    }
    let mut prefs = Preferences::load(config.preferences_path());
    let user = prefs
        .login(&args.email, args.name.as_deref(), env.clock.now())
        .context("failed to save user")?;
    render::write_user(&mut writer, Some(&user))?;
    Ok(())
}

fn handle_logout<W: Write>(config: &AppConfig, mut writer: W) -> Result<()> {
    let mut prefs = Preferences::load(config.preferences_path());
    if prefs.logout().context("failed to clear user")? {
        writeln!(writer, "Signed out")?;
    } else {
        writeln!(writer, "Not signed in")?;
    }
    Ok(())
}

/// Parse `YYYY-MM`.
pub fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{raw}': expected YYYY-MM"))?;
    Ok((date.year(), date.month()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;
    use taskmuse_core::{ManualClock, ScriptedRandom};
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf());
        (config, dir)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 11, 8, 0, 0).unwrap()
    }

    fn env() -> CommandEnv {
        CommandEnv {
            clock: Arc::new(ManualClock::new(now())),
            random: Box::new(ScriptedRandom::new()),
        }
    }

    fn run(config: &AppConfig, command: CliCommand) -> String {
        let mut output = Vec::new();
        execute_with(config, command, env(), &mut output).expect("execute");
        String::from_utf8(output).expect("utf8")
    }

    #[test]
    fn ask_answers_about_starter_tasks() {
        let (config, _dir) = temp_config();
        let output = run(
            &config,
            CliCommand::Ask(AskArgs {
                text: vec!["how".into(), "am".into(), "I".into(), "doing".into()],
            }),
        );
        assert!(output.contains("33% of your tasks (1/3)"));
        assert!(output.contains("try: Tell me more | Show task summary | Give me tips"));
    }

    #[test]
    fn dashboard_summarizes_starter_tasks() {
        let (config, _dir) = temp_config();
        let output = run(&config, CliCommand::Dashboard);
        assert!(output.contains("Completed: 1/3 (33%)"));
        assert!(output.contains("Overdue:   0"));
        assert!(output.contains("high 1, medium 1, low 0"));
        assert!(output.contains("Review project proposal"));
    }

    #[test]
    fn calendar_defaults_to_current_month() {
        let (config, _dir) = temp_config();
        let output = run(&config, CliCommand::Calendar(CalendarArgs::default()));
        assert!(output.starts_with("June 2025\n"));
        assert!(output.contains("Jun 11: Review project proposal"));
        assert!(output.contains("Jun 12: Team meeting"));
    }

    #[test]
    fn login_whoami_logout_cycle() {
        let (config, _dir) = temp_config();
        let login = run(
            &config,
            CliCommand::Login(LoginArgs {
                email: "grace@example.com".into(),
                name: None,
            }),
        );
        assert_eq!(login, "Signed in as grace <grace@example.com>\n");
        assert_eq!(
            run(&config, CliCommand::Whoami),
            "Signed in as grace <grace@example.com>\n"
        );
        assert_eq!(run(&config, CliCommand::Logout), "Signed out\n");
        assert_eq!(run(&config, CliCommand::Whoami), "Not signed in\n");
        assert_eq!(run(&config, CliCommand::Logout), "Not signed in\n");
    }

    #[test]
    fn login_rejects_non_email() {
        let (config, _dir) = temp_config();
        let args = LoginArgs {
            email: "grace".into(),
            name: None,
        };
        let mut output = Vec::new();
        assert!(execute_with(&config, CliCommand::Login(args), env(), &mut output).is_err());
    }

    #[rstest]
    #[case("2025-06", Some((2025, 6)))]
    #[case(" 1999-12 ", Some((1999, 12)))]
    #[case("2025-13", None)]
    #[case("june", None)]
    fn parses_month_argument(#[case] raw: &str, #[case] expected: Option<(i32, u32)>) {
        assert_eq!(parse_month(raw).ok(), expected);
    }
}
