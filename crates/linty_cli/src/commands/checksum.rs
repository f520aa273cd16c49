//! Checksum command implementation

use std::path::Path;

use linty_core::LintyConfig;
use linty_integrity::IntegrityRecord;
use miette::{IntoDiagnostic, Result};
use tracing::info;

/// Writes the control file for `artifacts`, or the configured artifacts when
/// none are given.
pub fn run_checksum(dir: &Path, artifacts: &[String]) -> Result<()> {
    let config = LintyConfig::from_dir(dir).into_diagnostic()?;
    let control_file = config.control_file_path();

    let artifacts = if artifacts.is_empty() {
        config.integrity.artifacts.as_slice()
    } else {
        artifacts
    };

    let base = control_file.parent().unwrap_or(dir);
    let record =
        IntegrityRecord::generate(base, artifacts, config.integrity.hash).into_diagnostic()?;
    record.write(&control_file).into_diagnostic()?;

    info!(
        "Wrote {} checksums to {}",
        record.len(),
        control_file.display()
    );
    Ok(())
}
