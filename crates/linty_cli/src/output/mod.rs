//! Output formatting module

mod json;
mod text;

use linty_core::Outcome;
use miette::Result;

use crate::cli::OutputFormat;

pub fn output_outcome(outcome: &Outcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(outcome)?,
        OutputFormat::Text => text::output_text(outcome),
    }

    Ok(())
}
