//! Dispatch pool.
//!
//! A fixed number of scoped worker threads pull candidate files from a
//! bounded work queue, run the responsible checker and push verdicts onto a
//! result channel drained by the calling thread. Each worker drives its
//! checker subprocesses on its own single-threaded tokio runtime. The scope is the join
//! barrier: [`DispatchPool::run_with`] only returns once every worker has
//! exited.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::checker::{self, CheckerCommand, CheckerRun};
use crate::classifier::{Classifier, Route};
use crate::config::LintyConfig;
use crate::observer::SharedObserver;
use crate::result::Verdict;

/// Detail attached to files that passed because no rule matched them.
pub const UNMATCHED_DETAIL: &str = "no matching rule";

pub struct DispatchPool<'a> {
    config: &'a LintyConfig,
    root: PathBuf,
    classifier: Classifier,
    observer: SharedObserver,
}

impl<'a> DispatchPool<'a> {
    /// Creates a pool that runs checkers from `root`, the directory candidate
    /// paths are relative to.
    pub fn new(root: impl Into<PathBuf>, config: &'a LintyConfig, observer: SharedObserver) -> Self {
        let classifier = Classifier::from_config(config, observer.clone());
        Self {
            config,
            root: root.into(),
            classifier,
            observer,
        }
    }

    /// Number of workers used for `candidates` files.
    fn worker_count(&self, candidates: usize) -> usize {
        self.config.worker_count().min(candidates).max(1)
    }

    /// Classifies and checks a single file on the current thread.
    pub fn check_file(&self, path: &Path) -> Verdict {
        match checker::runtime() {
            Ok(runtime) => self.check_file_on(&runtime, path),
            Err(e) => Verdict::fail(path, format!("failed to start checker runtime: {}", e)),
        }
    }

    fn check_file_on(&self, runtime: &Runtime, path: &Path) -> Verdict {
        match self.classifier.route(path) {
            Route::AutoPass => Verdict::pass(path).with_detail(UNMATCHED_DETAIL),
            Route::Check(dispatch) => {
                let checker = self.config.resolve_checker(dispatch.checker);
                let command = CheckerCommand::new(&self.config.runner, checker, path)
                    .current_dir(&self.root)
                    .timeout(self.config.checker_timeout());

                self.observer
                    .dispatching(path, dispatch.file_type, &command.display());
                let run = runtime.block_on(command.run_async());
                if let CheckerRun::Completed { output, .. } = &run {
                    self.observer.checker_output(path, output);
                }
                run.into_verdict(path, dispatch.protocol)
            }
        }
    }

    /// Checks every candidate and returns all verdicts, in completion order.
    pub fn run(&self, candidates: &[PathBuf]) -> Vec<Verdict> {
        let mut verdicts = Vec::with_capacity(candidates.len());
        self.run_with(candidates, |verdict| {
            verdicts.push(verdict);
            ControlFlow::Continue(())
        });
        verdicts
    }

    /// Checks every candidate, handing each verdict to `sink` on the calling
    /// thread as soon as it completes.
    ///
    /// When `sink` returns `Break`, queued files are no longer started;
    /// checkers already running finish and their verdicts are discarded.
    pub fn run_with<F>(&self, candidates: &[PathBuf], mut sink: F)
    where
        F: FnMut(Verdict) -> ControlFlow<()>,
    {
        if candidates.is_empty() {
            return;
        }

        let workers = self.worker_count(candidates.len());
        let (job_tx, job_rx) = crossbeam_channel::bounded::<&Path>(workers * 2);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<Verdict>();
        let cancelled = AtomicBool::new(false);
        let cancelled = &cancelled;

        debug!(
            "Dispatching {} files across {} workers",
            candidates.len(),
            workers
        );

        thread::scope(|scope| {
            for id in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    let runtime = checker::runtime();
                    if let Err(e) = &runtime {
                        warn!("Worker {} has no checker runtime: {}", id, e);
                    }
                    for path in job_rx.iter() {
                        if cancelled.load(Ordering::Relaxed) {
                            break;
                        }
                        let verdict = match &runtime {
                            Ok(runtime) => self.check_file_on(runtime, path),
                            Err(e) => Verdict::fail(
                                path,
                                format!("failed to start checker runtime: {}", e),
                            ),
                        };
                        if result_tx.send(verdict).is_err() {
                            break;
                        }
                    }
                    debug!("Worker {} finished", id);
                });
            }
            drop(job_rx);
            drop(result_tx);

            scope.spawn(move || {
                for path in candidates {
                    if cancelled.load(Ordering::Relaxed) || job_tx.send(path.as_path()).is_err()
                    {
                        break;
                    }
                }
            });

            for verdict in result_rx.iter() {
                self.observer.verdict(&verdict);
                if sink(verdict).is_break() {
                    cancelled.store(true, Ordering::Relaxed);
                    break;
                }
            }
            drop(result_rx);
        });
    }
}
