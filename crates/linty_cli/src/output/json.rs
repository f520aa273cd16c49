//! JSON output formatter

use linty_core::Outcome;
use miette::{IntoDiagnostic, Result};

pub fn output_json(outcome: &Outcome) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(outcome).into_diagnostic()?
    );
    Ok(())
}
