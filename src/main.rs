use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = taskmuse::cli::Cli::parse();
    taskmuse::logging::init_tracing(cli.log_filter.as_deref())?;

    match cli.command.clone() {
        Some(taskmuse::cli::CliCommand::Shell(_)) | None => {
            taskmuse::shell::run(taskmuse::ShellOptions::from_cli(&cli))?;
        }
        Some(command) => {
            let config = taskmuse::config::from_cli(&cli)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            taskmuse::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
