//! Linty CLI

mod cli;
mod commands;
mod output;
mod utils;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use linty_core::LintyConfig;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::commands::checksum::run_checksum;
use crate::commands::init::run_init;
use crate::commands::lint::run_lint;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            print!("{}", e.render());
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // The configuration may ask for verbose output, so it is read before
    // logging is set up and its errors are reported afterwards.
    let config = match (&cli.command, &cli.config_dir) {
        (None, Some(dir)) => Some(LintyConfig::from_dir(dir)),
        _ => None,
    };
    let verbose = cli.verbose || matches!(&config, Some(Ok(c)) if c.verbose);

    // Stdout carries the JSON document alone, so progress lines are muted.
    let json_output = cli.command.is_none() && cli.format == OutputFormat::Json;
    let filter = if json_output {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .with_writer(std::io::stdout)
        .init();

    match run(&cli, config) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn run(
    cli: &Cli,
    config: Option<Result<LintyConfig, linty_core::LinterError>>,
) -> Result<bool> {
    match &cli.command {
        Some(Commands::Init { dir, force }) => {
            run_init(dir, *force)?;
            Ok(false)
        }
        Some(Commands::Checksum { dir, artifacts }) => {
            run_checksum(dir, artifacts)?;
            Ok(false)
        }
        None => match config {
            Some(config) => run_lint(cli, config),
            None => {
                use clap::CommandFactory;
                println!("{}", Cli::command().render_usage());
                Err(miette::miette!(
                    "Missing configuration directory argument"
                ))
            }
        },
    }
}
