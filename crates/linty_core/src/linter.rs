//! Core linter engine.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::aggregator::Aggregator;
use crate::file_finder::FileFinder;
use crate::observer::{SharedObserver, TracingObserver};
use crate::pool::DispatchPool;
use crate::result::{Outcome, Verdict};
use crate::{LinterError, LintyConfig};

/// Orchestrates discovery, dispatch and aggregation over one scan root.
///
/// The integrity gate is not part of the engine; callers that enable strict
/// mode must run it before calling [`Linter::lint`].
pub struct Linter {
    config: LintyConfig,
    root: PathBuf,
    observer: SharedObserver,
}

impl Linter {
    /// Creates a linter for `root` that reports through `tracing`.
    pub fn new(config: LintyConfig, root: impl Into<PathBuf>) -> Self {
        let observer = TracingObserver::shared(config.verbose);
        Self {
            config,
            root: root.into(),
            observer,
        }
    }

    /// Replaces the observer.
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &LintyConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovers the candidate files, relative to the root.
    pub fn discover(&self) -> Result<Vec<PathBuf>, LinterError> {
        FileFinder::new(&self.root, &self.config, self.observer.clone()).discover_files()
    }

    /// Discovers and checks every candidate file.
    pub fn lint(&self) -> Result<Outcome, LinterError> {
        let files = self.discover()?;
        Ok(self.lint_files(&files))
    }

    /// Checks the given files, relative to the root, and aggregates the
    /// verdicts according to the configured report policy.
    pub fn lint_files(&self, files: &[PathBuf]) -> Outcome {
        let pool = DispatchPool::new(&self.root, &self.config, self.observer.clone());
        let mut aggregator = Aggregator::new(self.config.report);

        pool.run_with(files, |verdict| aggregator.observe(verdict));

        let outcome = aggregator.finish();
        info!(
            "Checked {} of {} files, {} failed",
            outcome.checked,
            files.len(),
            outcome.failures.len()
        );
        outcome
    }

    /// Checks the given files and returns the raw verdicts.
    pub fn verdicts(&self, files: &[PathBuf]) -> Vec<Verdict> {
        DispatchPool::new(&self.root, &self.config, self.observer.clone()).run(files)
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("root", &self.root)
            .field("workers", &self.config.worker_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintRule;
    use crate::observer::NullObserver;
    use crate::test_utils::write_tree;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_lint_tree_without_rules_passes() {
        let dir = tempdir().unwrap();
        write_tree(dir.path(), &["a.js", "b.txt"]);

        let linter =
            Linter::new(LintyConfig::new(), dir.path()).with_observer(Arc::new(NullObserver));
        let outcome = linter.lint().unwrap();

        assert!(outcome.passed);
        assert_eq!(outcome.checked, 2);
    }

    #[test]
    fn test_lint_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let linter = Linter::new(LintyConfig::new(), dir.path().join("nope"));
        assert!(linter.lint().is_err());
    }

    #[test]
    fn test_fail_fast_reports_single_failure() {
        let dir = tempdir().unwrap();
        write_tree(dir.path(), &["a.js", "b.js", "c.js"]);

        let mut config = LintyConfig::new();
        config.report = crate::ReportPolicy::FailFast;
        config.lint = vec![LintRule::new("style", r"\.js$").with_linter("/nonexistent/checker")];

        let linter = Linter::new(config, dir.path()).with_observer(Arc::new(NullObserver));
        let outcome = linter.lint().unwrap();

        assert!(!outcome.passed);
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn test_fail_fast_with_many_workers_returns() {
        let dir = tempdir().unwrap();
        let files: Vec<String> = (0..50).map(|i| format!("f{:02}.js", i)).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        write_tree(dir.path(), &refs);

        let mut config = LintyConfig::new();
        config.concurrency = 3;
        config.report = crate::ReportPolicy::FailFast;
        config.lint = vec![LintRule::new("style", r"\.js$").with_linter("/nonexistent/checker")];

        let linter = Linter::new(config, dir.path()).with_observer(Arc::new(NullObserver));
        let outcome = linter.lint().unwrap();

        assert_eq!(outcome.checked, 1);
        assert!(!outcome.passed);
    }

    #[test]
    fn test_debug_output() {
        let linter = Linter::new(LintyConfig::new(), ".");
        assert!(format!("{:?}", linter).contains("workers: 1"));
    }
}
