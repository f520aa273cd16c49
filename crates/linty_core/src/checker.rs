//! External checker invocation and result protocols.
//!
//! A checker is an out-of-process command run as `runner... <checker> <file>`
//! from the scan root. Its combined output is interpreted by one of two
//! [`Protocol`]s. Every failure mode of a single invocation (spawn error,
//! non-zero exit, malformed output, timeout) becomes a failing [`Verdict`].

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::runtime::Runtime;
use tokio::time::timeout;

use crate::result::Verdict;

/// Token the boolean protocol expects on success.
pub const BOOLEAN_PASS_TOKEN: &str = "true";

/// Format of a checker's result payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// The trimmed output must be exactly `true`.
    Boolean,
    /// The output is a JSON array of `{file, passed, detail}` records.
    #[default]
    Structured,
}

impl Protocol {
    /// Turns checker output into a verdict for `file`.
    pub fn interpret(self, file: &Path, output: &str) -> Verdict {
        match self {
            Self::Boolean => interpret_boolean(file, output),
            Self::Structured => interpret_structured(file, output),
        }
    }
}

/// One record of the structured protocol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckRecord {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(alias = "result")]
    pub passed: bool,
    #[serde(default, alias = "error")]
    pub detail: Option<String>,
}

fn interpret_boolean(file: &Path, output: &str) -> Verdict {
    if output.trim() == BOOLEAN_PASS_TOKEN {
        return Verdict::pass(file);
    }
    if output.trim().is_empty() {
        Verdict::fail(file, "checker produced no output")
    } else {
        Verdict::fail(file, output.trim_end())
    }
}

fn interpret_structured(file: &Path, output: &str) -> Verdict {
    let records = match parse_records(output) {
        Ok(records) => records,
        Err(e) => return Verdict::fail(file, format!("Failed to parse lint results: {}", e)),
    };

    match records.into_iter().find(|record| !record.passed) {
        Some(failed) => Verdict {
            file: file.to_path_buf(),
            passed: false,
            detail: failed.detail,
        },
        None => Verdict::pass(file),
    }
}

/// Parses a structured payload.
///
/// The whole output is tried first; checkers that print a preamble before
/// the JSON array are handled by falling back to the last non-empty line.
pub fn parse_records(output: &str) -> Result<Vec<CheckRecord>, serde_json::Error> {
    let whole = serde_json::from_str::<Vec<CheckRecord>>(output.trim());
    if whole.is_ok() {
        return whole;
    }

    let last_line = output.lines().rev().map(str::trim).find(|l| !l.is_empty());
    match last_line {
        Some(line) if line != output.trim() => {
            serde_json::from_str::<Vec<CheckRecord>>(line).or(whole)
        }
        _ => whole,
    }
}

/// How a checker process ended.
#[derive(Debug)]
pub enum CheckerRun {
    Completed { status: ExitStatus, output: String },
    SpawnFailed(String),
    TimedOut(Duration),
}

impl CheckerRun {
    /// Converts the run into a verdict using `protocol` for successful exits.
    pub fn into_verdict(self, file: &Path, protocol: Protocol) -> Verdict {
        match self {
            Self::Completed { status, output } if status.success() => {
                protocol.interpret(file, &output)
            }
            Self::Completed { status, output } => {
                let output = output.trim();
                if output.is_empty() {
                    Verdict::fail(file, format!("checker exited with {}", status))
                } else {
                    Verdict::fail(file, format!("checker exited with {}: {}", status, output))
                }
            }
            Self::SpawnFailed(message) => Verdict::fail(file, message),
            Self::TimedOut(limit) => {
                Verdict::fail(file, format!("checker timed out after {:?}", limit))
            }
        }
    }
}

/// A fully resolved checker command line.
#[derive(Debug, Clone)]
pub struct CheckerCommand {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl CheckerCommand {
    /// Builds `runner... <checker> <file>`. Without a runner the checker is
    /// executed directly.
    pub fn new(runner: &[String], checker: impl Into<PathBuf>, file: &Path) -> Self {
        let checker: PathBuf = checker.into();
        let mut parts: Vec<OsString> = runner.iter().map(OsString::from).collect();
        parts.push(checker.into_os_string());
        parts.push(file.as_os_str().to_os_string());

        let program = parts.remove(0);
        Self {
            program,
            args: parts,
            cwd: None,
            timeout: None,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the checker to completion (or until the timeout expires) on a
    /// throwaway runtime.
    pub fn run(&self) -> CheckerRun {
        match runtime() {
            Ok(runtime) => runtime.block_on(self.run_async()),
            Err(e) => CheckerRun::SpawnFailed(format!("failed to start checker runtime: {}", e)),
        }
    }

    /// Runs the checker. The child is killed if the timeout expires or the
    /// future is dropped.
    pub async fn run_async(&self) -> CheckerRun {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                return CheckerRun::SpawnFailed(format!(
                    "failed to start checker {}: {}",
                    self.program.to_string_lossy(),
                    e
                ));
            }
        };

        let output = match self.timeout {
            Some(limit) => match timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_) => return CheckerRun::TimedOut(limit),
            },
            None => child.wait_with_output().await,
        };

        match output {
            Ok(output) => CheckerRun::Completed {
                status: output.status,
                output: combine(&output.stdout, &output.stderr),
            },
            Err(e) => CheckerRun::SpawnFailed(format!("failed to wait for checker: {}", e)),
        }
    }
}

/// Single-threaded runtime that drives checker subprocesses. Pool workers
/// build one each and reuse it for every file they check.
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn combine(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(stderr));
    combined
}
