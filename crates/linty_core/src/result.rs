//! Per-file verdicts and the aggregate outcome.

use std::path::PathBuf;

use serde::Serialize;

/// The pass/fail outcome of checking one candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Path of the file, relative to the scan root.
    pub file: PathBuf,
    pub passed: bool,
    /// Diagnostic or raw checker output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Verdict {
    pub fn pass(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            passed: true,
            detail: None,
        }
    }

    pub fn fail(file: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Result of aggregating every verdict of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub passed: bool,
    /// Number of verdicts observed.
    pub checked: usize,
    /// Failing verdicts; a single entry under fail-fast reporting.
    pub failures: Vec<Verdict>,
}

impl Outcome {
    /// Exit status for the process: 0 when every verdict passed.
    pub fn exit_code(&self) -> u8 {
        if self.passed { 0 } else { 1 }
    }
}
