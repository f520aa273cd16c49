//! Lint command implementation

use linty_core::{LinterError, Linter, LintyConfig};
use linty_integrity::{GitHubAuthorLookup, IntegrityGate};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::output::output_outcome;
use crate::utils::create_tokio_runtime;

/// Runs the gate, discovery, dispatch and reporting. Returns whether any
/// file failed.
pub fn run_lint(cli: &Cli, config: Result<LintyConfig, LinterError>) -> Result<bool> {
    let mut config = config.into_diagnostic()?;
    if cli.verbose {
        config.verbose = true;
    }

    if config.secure {
        verify_integrity(&config)?;
    }

    let linter = Linter::new(config, &cli.root);
    debug!("{:?}", linter);

    let outcome = linter.lint().into_diagnostic()?;
    output_outcome(&outcome, cli.format)?;

    Ok(!outcome.passed)
}

fn verify_integrity(config: &LintyConfig) -> Result<()> {
    let gate = IntegrityGate::new(config.control_file_path(), &config.integrity);
    let lookup = GitHubAuthorLookup::from_config(&config.integrity).into_diagnostic()?;

    let runtime = create_tokio_runtime()?;
    let state = runtime.block_on(gate.run(true, &lookup));

    if let Some(message) = state.failure() {
        return Err(miette::miette!("{}. Aborting.", message));
    }

    info!("Integrity check passed for {}", gate.control_file().display());
    Ok(())
}
