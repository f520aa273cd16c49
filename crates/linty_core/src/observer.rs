//! Run events.
//!
//! Components receive an [`Observer`] at construction instead of consulting a
//! global verbose flag. [`TracingObserver`] forwards every event to `tracing`,
//! at `info` when verbose output was requested and at `debug` otherwise.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::result::Verdict;

/// Why a path was left out of the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Matched a rule from the version-control ignore file.
    VersionControl,
    /// Matched a configured ignore pattern.
    Pattern,
    /// Inside a reserved control-metadata directory.
    Reserved,
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VersionControl => f.write_str(".gitignore"),
            Self::Pattern => f.write_str("ignore pattern"),
            Self::Reserved => f.write_str("reserved directory"),
        }
    }
}

/// Receives progress events from the engine.
///
/// All methods default to no-ops.
pub trait Observer: Send + Sync {
    fn excluded(&self, _path: &Path, _is_dir: bool, _reason: ExclusionReason) {}

    fn discovered(&self, _path: &Path) {}

    fn dispatching(&self, _path: &Path, _file_type: &str, _command: &str) {}

    fn unmatched(&self, _path: &Path) {}

    fn checker_output(&self, _path: &Path, _output: &str) {}

    fn verdict(&self, _verdict: &Verdict) {}
}

pub type SharedObserver = Arc<dyn Observer>;

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Observer backed by `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver {
    verbose: bool,
}

impl TracingObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn shared(verbose: bool) -> SharedObserver {
        Arc::new(Self::new(verbose))
    }

    fn emit(&self, message: std::fmt::Arguments<'_>) {
        if self.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }
}

impl Observer for TracingObserver {
    fn excluded(&self, path: &Path, is_dir: bool, reason: ExclusionReason) {
        let kind = if is_dir { "directory" } else { "file" };
        self.emit(format_args!(
            "Skipping {} {} ({})",
            kind,
            path.display(),
            reason
        ));
    }

    fn discovered(&self, path: &Path) {
        self.emit(format_args!("Found file: {}", path.display()));
    }

    fn dispatching(&self, path: &Path, file_type: &str, command: &str) {
        self.emit(format_args!(
            "Running {} check on {}: {}",
            file_type,
            path.display(),
            command
        ));
    }

    fn unmatched(&self, path: &Path) {
        self.emit(format_args!("No rule matches {}", path.display()));
    }

    fn checker_output(&self, path: &Path, output: &str) {
        self.emit(format_args!(
            "Checker output for {}: {}",
            path.display(),
            output.trim_end()
        ));
    }

    fn verdict(&self, verdict: &Verdict) {
        self.emit(format_args!(
            "File: {}, Result: {}",
            verdict.file.display(),
            verdict.passed
        ));
    }
}
