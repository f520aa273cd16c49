//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Linty - dispatch files to external checkers and aggregate the verdicts
#[derive(Parser)]
#[command(name = "linty")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory containing linty.json and the checker scripts
    pub config_dir: Option<PathBuf>,

    /// Directory to scan
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default linty.json
    Init {
        /// Configuration directory to create the file in
        dir: PathBuf,

        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Regenerate the integrity control file
    Checksum {
        /// Configuration directory
        dir: PathBuf,

        /// Artifacts to record, relative to the control file (defaults to
        /// the configured list)
        artifacts: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
