//! # linty_core
//!
//! Orchestration engine for Linty.
//!
//! This crate provides:
//! - Configuration loading (`linty.json`)
//! - File discovery with layered exclusion rules
//! - Regex-driven classification of files to external checkers
//! - A bounded worker pool that runs the checkers
//! - Aggregation of per-file verdicts
//!
//! ## Example
//!
//! ```rust,ignore
//! use linty_core::{Linter, LintyConfig};
//!
//! let config = LintyConfig::from_dir("config")?;
//! let outcome = Linter::new(config, ".").lint()?;
//! for failure in &outcome.failures {
//!     println!("{}: {:?}", failure.file.display(), failure.detail);
//! }
//! ```

mod aggregator;
pub mod checker;
pub mod classifier;
mod config;
mod error;
pub mod exclusion;
pub mod file_finder;
mod linter;
pub mod observer;
pub mod pool;
mod result;

pub use aggregator::{Aggregator, ReportPolicy, aggregate};
pub use checker::{CheckRecord, CheckerCommand, CheckerRun, Protocol};
pub use classifier::{Classifier, Dispatch, Route, UnmatchedPolicy};
pub use config::{FallbackChecker, LintRule, LintyConfig};
pub use error::LinterError;
pub use exclusion::ExclusionFilter;
pub use file_finder::{FileFinder, WalkErrorPolicy, discover};
pub use linter::Linter;
pub use observer::{ExclusionReason, NullObserver, Observer, SharedObserver, TracingObserver};
pub use pool::DispatchPool;
pub use result::{Outcome, Verdict};

#[cfg(test)]
pub mod test_utils;
