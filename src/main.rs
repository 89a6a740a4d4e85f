//! Entry point for the transmerge command line tool.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::{
    CommandFactory,
    Parser,
};
use tracing_subscriber::EnvFilter;
use transmerge::cli::{
    Cli,
    Command,
    LONG_STORY,
};
use transmerge::commands::{
    run_patch,
    run_sieve,
};
use transmerge::config::resolve_settings;
use transmerge::error::TransmergeError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.long_story {
        #[allow(clippy::print_stdout)]
        {
            println!("{LONG_STORY}");
        }
        return ExitCode::SUCCESS;
    }

    let Some(command) = cli.command else {
        // Global flags alone, e.g. `transmerge --quiet`.
        if let Err(error) = write_help(std::io::stdout().lock()) {
            tracing::error!("Failed to print help: {error}");
            return ExitCode::FAILURE;
        }
        return ExitCode::from(2);
    };

    match run(command, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn write_help(mut writer: impl Write) -> std::io::Result<()> {
    Cli::command().write_help(&mut writer)?;
    writer.flush()
}

/// Logs go to stderr so that `-` can stream a document on stdout.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.quiet {
        "warn"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command, config_file: Option<&Path>) -> Result<(), TransmergeError> {
    let cwd = std::env::current_dir().map_err(|e| TransmergeError::Io { path: ".".into(), source: e })?;
    let settings = resolve_settings(config_file, &cwd)?;

    match command {
        Command::Sieve(args) => {
            let summary = run_sieve(&args.into_config(&settings), &settings)?;
            tracing::info!(
                carried = summary.updated.saturating_sub(summary.added),
                added = summary.added,
                changed = summary.changed,
                dropped = summary.dropped,
                renamed = summary.renamed,
                filtered = summary.filtered,
                anomalies = summary.anomalies.len(),
                "Sieve finished"
            );
        }
        Command::Patch(args) => {
            let summary = run_patch(&args.into_config(), &settings)?;
            tracing::info!(
                base = summary.base,
                patched = summary.patched,
                replaced = summary.replaced,
                "Patch finished"
            );
        }
    }

    Ok(())
}
