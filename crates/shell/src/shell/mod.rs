//! Interactive terminal surface.
//!
//! One current-thread tokio runtime drives everything: stdin lines, delayed
//! chat replies, the reminder interval, the first-run welcome timer and
//! Ctrl-C. Handlers run to completion between awaits, so each scheduler tick
//! and each command sees one consistent task snapshot.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Datelike;
use taskmuse_core::parser::{apply_capture, parse_capture};
use taskmuse_core::queries::{self, CalendarMonth, DashboardSummary};
use taskmuse_core::seeding::seed_tasks;
use taskmuse_core::welcome::announce_welcome;
use taskmuse_core::{
    Assistant, Clock, NotificationScheduler, Preferences, RandomSource, SchedulerConfig,
    StdRandom, SystemClock, TaskId, TaskInput, TaskStore, TasksService, TickReport, VoiceEvent,
    VoiceSession,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::config::{AppConfig, ShellOptions};
use crate::render;
use crate::telemetry::{Event, Handle};

mod chat;
mod console;
mod input;
mod notifier;
mod voice;

pub use chat::ChatPanel;
pub use console::Console;
pub use input::{parse_line, ShellInput, COMMAND_HELP};
pub use notifier::TerminalSink;
pub use voice::ConsoleSpeech;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    console: Console,
    clock: Arc<dyn Clock>,
    service: TasksService,
    chat: ChatPanel,
    voice: VoiceSession<ConsoleSpeech>,
    scheduler: NotificationScheduler,
    scheduler_random: Box<dyn RandomSource>,
    sink: TerminalSink,
    prefs: Preferences,
    telemetry: Handle,
}

impl Shell {
    /// `random` is called once per component that needs its own source.
    pub fn new(
        options: &ShellOptions,
        prefs: Preferences,
        console: Console,
        clock: Arc<dyn Clock>,
        mut random: impl FnMut() -> Box<dyn RandomSource>,
    ) -> Self {
        let service = TasksService::new(TaskStore::new(seed_tasks(clock.now())), clock.clone());
        let chat = ChatPanel::new(
            Assistant::new(clock.clone(), random()),
            clock.clone(),
            random(),
            options.thinking_delay_min,
            options.thinking_delay_max,
        );
        let voice = VoiceSession::new(
            ConsoleSpeech::new(console.clone()),
            Assistant::new(clock.clone(), random()),
            service.clone(),
        );
        let telemetry = Handle::new();
        telemetry.record(Event::AppStarted);
        Self {
            sink: TerminalSink::new(console.clone()),
            console,
            clock,
            service,
            chat,
            voice,
            scheduler: NotificationScheduler::new(options.scheduler.clone()),
            scheduler_random: random(),
            prefs,
            telemetry,
        }
    }

    pub fn service(&self) -> &TasksService {
        &self.service
    }

    pub fn telemetry(&self) -> &Handle {
        &self.telemetry
    }

    pub fn needs_welcome(&self) -> bool {
        !self.prefs.welcome_shown()
    }

    pub fn greet(&self) -> Result<()> {
        self.console
            .line("TaskMuse shell. Type /help for commands, anything else to chat.")?;
        if let Some(user) = self.prefs.current_user() {
            self.console.line(format!("Signed in as {}", user.name))?;
        }
        if let Some(greeting) = self.chat.log().messages().first() {
            self.console.lines(render::chat_lines(greeting))?;
        }
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match parse_line(line) {
            ShellInput::Blank => {}
            ShellInput::Text(text) => {
                if self.voice.is_listening() {
                    self.handle_voice(text)?;
                } else {
                    self.handle_chat(&text)?;
                }
            }
            ShellInput::Tasks(filter) => {
                let snapshot = self.service.snapshot();
                let now = self.clock.now();
                self.console
                    .with_writer(|w| render::write_tasks(w, &snapshot, filter, now))?;
            }
            ShellInput::Add(text) => self.add_task(&text)?,
            ShellInput::Edit { id, text: None } => match self.service.fetch_task(id) {
                Some(task) => self.console.line(format!(
                    "/edit {} {}",
                    task.id,
                    render::compose_task_capture(&task)
                ))?,
                None => self.warn(format!("No task with id {id}"))?,
            },
            ShellInput::Edit {
                id,
                text: Some(text),
            } => self.edit_task(id, &text)?,
            ShellInput::Toggle(id) => match self.service.toggle_complete(id) {
                Ok(task) => {
                    self.telemetry
                        .record(Event::MutationApplied("toggle".into()));
                    let state = if task.completed { "complete" } else { "pending" };
                    self.console
                        .line(format!("Marked #{} {} as {state}", task.id, task.title))?;
                }
                Err(err) => self.mutation_failed("toggle", err.to_string())?,
            },
            ShellInput::Delete(id) => {
                let results = self.service.delete(&[id]);
                if results.iter().any(|result| result.deleted) {
                    self.telemetry
                        .record(Event::MutationApplied("delete".into()));
                    self.console.line(format!("Deleted task #{id} 🗑️"))?;
                } else {
                    self.mutation_failed("delete", format!("No task with id {id}"))?;
                }
            }
            ShellInput::Dashboard => {
                let snapshot = self.service.snapshot();
                let summary = DashboardSummary::build(&snapshot, self.clock.now());
                let due_today =
                    queries::due_on(&snapshot, self.clock.today(), self.clock.as_ref()).len();
                self.console
                    .with_writer(|w| render::write_dashboard(w, &summary, due_today))?;
            }
            ShellInput::Calendar(month) => {
                let today = self.clock.today();
                let (year, month) = month.unwrap_or((today.year(), today.month()));
                let snapshot = self.service.snapshot();
                match CalendarMonth::build(&snapshot, year, month, self.clock.as_ref()) {
                    Some(calendar) => self
                        .console
                        .with_writer(|w| render::write_calendar(w, &calendar, today))?,
                    None => self.warn(format!("Invalid month {year}-{month:02}"))?,
                }
            }
            ShellInput::Listen => {
                let listening = self.voice.start(&mut self.sink);
                self.telemetry.record(Event::VoiceToggled { listening });
            }
            ShellInput::Stop => {
                self.voice.stop();
                self.telemetry
                    .record(Event::VoiceToggled { listening: false });
            }
            ShellInput::Help => self.console.line(COMMAND_HELP)?,
            ShellInput::Quit => return Ok(Flow::Quit),
            ShellInput::Invalid(message) => self.warn(message)?,
        }
        Ok(Flow::Continue)
    }

    pub fn tick(&mut self) -> TickReport {
        let snapshot = self.service.snapshot();
        let report = self.scheduler.tick(
            &snapshot,
            self.clock.as_ref(),
            self.scheduler_random.as_mut(),
            &mut self.sink,
        );
        self.telemetry.record(Event::SchedulerTicked {
            emitted: report.emitted(),
            dropped: report.dropped,
        });
        report
    }

    pub fn welcome(&mut self) {
        match announce_welcome(&mut self.prefs, &mut self.sink) {
            Ok(true) => self.telemetry.record(Event::WelcomeShown),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist welcome flag");
                self.telemetry.record(Event::WelcomeShown);
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.chat.cancel_pending();
        self.voice.stop();
    }

    fn handle_chat(&mut self, text: &str) -> Result<()> {
        let snapshot = self.service.snapshot();
        if self.chat.submit(text, &snapshot).is_some() {
            self.telemetry.record(Event::ChatSubmitted);
            self.console.line("🤖 is thinking...")?;
        }
        Ok(())
    }

    fn show_reply(&mut self, message: &taskmuse_core::ChatMessage) -> Result<()> {
        self.telemetry.record(Event::ChatReplied);
        self.console.lines(render::chat_lines(message))?;
        Ok(())
    }

    fn handle_voice(&mut self, text: String) -> Result<()> {
        if let Some(result) = self
            .voice
            .handle_event(VoiceEvent::Utterance(text), &mut self.sink)
        {
            self.telemetry
                .record(Event::VoiceHandled(result.intent.label().to_string()));
            if let Some(mutation) = &result.mutation {
                self.telemetry
                    .record(Event::MutationApplied(mutation.label().to_string()));
            }
        }
        Ok(())
    }

    fn add_task(&mut self, text: &str) -> Result<()> {
        let outcome = parse_capture(text).and_then(|input| Ok(self.service.add(input)?));
        match outcome {
            Ok(task) => {
                self.telemetry.record(Event::MutationApplied("add".into()));
                self.console
                    .line(format!("Added #{} {}", task.id, task.title))?;
            }
            Err(err) => self.mutation_failed("add", err.to_string())?,
        }
        Ok(())
    }

    fn edit_task(&mut self, id: TaskId, text: &str) -> Result<()> {
        let Some(current) = self.service.fetch_task(id) else {
            return self.mutation_failed("edit", format!("No task with id {id}"));
        };
        let outcome = apply_capture(TaskInput::from(&current), text)
            .and_then(|input| Ok(self.service.update(id, input)?));
        match outcome {
            Ok(task) => {
                self.telemetry.record(Event::MutationApplied("edit".into()));
                self.console
                    .line(format!("Updated #{} {}", task.id, task.title))?;
            }
            Err(err) => self.mutation_failed("edit", err.to_string())?,
        }
        Ok(())
    }

    fn mutation_failed(&self, action: &str, error: String) -> Result<()> {
        self.warn(&error)?;
        self.telemetry.record(Event::MutationFailed {
            action: action.to_string(),
            error,
        });
        Ok(())
    }

    fn warn(&self, message: impl std::fmt::Display) -> Result<()> {
        self.console.line(format!("⚠ {message}"))?;
        Ok(())
    }
}

/// Run the shell on stdin/stdout until `/quit`, end of input or Ctrl-C.
pub fn run(options: ShellOptions) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run_async(options))
}

async fn run_async(options: ShellOptions) -> Result<()> {
    let config = AppConfig::discover(options.data_dir.clone())
        .context("failed to resolve data directory")?;
    let prefs = Preferences::load(config.preferences_path());
    let mut shell = Shell::new(
        &options,
        prefs,
        Console::stdout(),
        Arc::new(SystemClock),
        || Box::new(StdRandom::from_entropy()) as Box<dyn RandomSource>,
    );
    shell.greet()?;
    event_loop(
        &mut shell,
        BufReader::new(tokio::io::stdin()),
        &options.scheduler,
    )
    .await
}

pub async fn event_loop<R>(shell: &mut Shell, reader: R, config: &SchedulerConfig) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut ticker = tokio::time::interval(config.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let welcome = tokio::time::sleep(config.welcome_delay);
    tokio::pin!(welcome);
    let mut welcome_pending = shell.needs_welcome();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read input")? {
                    Some(line) => {
                        if shell.handle_line(&line)? == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                }
            }
            Some(message) = shell.chat.next_reply() => shell.show_reply(&message)?,
            _ = ticker.tick() => {
                shell.tick();
            }
            _ = &mut welcome, if welcome_pending => {
                welcome_pending = false;
                shell.welcome();
            }
            _ = &mut ctrl_c => break,
        }
    }

    shell.shutdown();
    Ok(())
}
