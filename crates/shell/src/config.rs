use std::path::PathBuf;
use std::time::Duration;

pub use taskmuse_core::config::*;
use taskmuse_core::SchedulerConfig;

use crate::cli::{Cli, CliCommand};

pub const THINKING_DELAY_MIN: Duration = Duration::from_millis(1000);
pub const THINKING_DELAY_MAX: Duration = Duration::from_millis(2000);

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    AppConfig::discover(cli.data_dir.clone())
}

/// Everything the interactive shell needs besides the resolved data directory.
#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub data_dir: Option<PathBuf>,
    pub scheduler: SchedulerConfig,
    pub thinking_delay_min: Duration,
    pub thinking_delay_max: Duration,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            data_dir: None,
            scheduler: SchedulerConfig::default(),
            thinking_delay_min: THINKING_DELAY_MIN,
            thinking_delay_max: THINKING_DELAY_MAX,
        }
    }
}

impl ShellOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut options = Self {
            data_dir: cli.data_dir.clone(),
            ..Self::default()
        };
        if let Some(CliCommand::Shell(args)) = &cli.command {
            if let Some(seconds) = args.tick_seconds {
                options.scheduler.tick_interval = Duration::from_secs(seconds);
            }
        }
        options
    }
}
