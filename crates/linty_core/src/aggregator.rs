//! Result aggregation.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::result::{Outcome, Verdict};

/// How failures are collected while draining verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportPolicy {
    /// Stop at the first failing verdict and report only that one.
    FailFast,
    /// Drain every verdict and report all failures, ordered by path.
    #[default]
    FailComplete,
}

/// Folds verdicts into an [`Outcome`].
///
/// The pass/fail result does not depend on the order verdicts arrive in.
#[derive(Debug)]
pub struct Aggregator {
    policy: ReportPolicy,
    checked: usize,
    failures: Vec<Verdict>,
}

impl Aggregator {
    pub fn new(policy: ReportPolicy) -> Self {
        Self {
            policy,
            checked: 0,
            failures: Vec::new(),
        }
    }

    /// Records one verdict. Returns `Break` once no further verdicts are
    /// wanted, which only happens under [`ReportPolicy::FailFast`].
    pub fn observe(&mut self, verdict: Verdict) -> ControlFlow<()> {
        if self.is_done() {
            return ControlFlow::Break(());
        }

        self.checked += 1;
        if !verdict.passed {
            self.failures.push(verdict);
        }

        if self.is_done() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn is_done(&self) -> bool {
        self.policy == ReportPolicy::FailFast && !self.failures.is_empty()
    }

    pub fn finish(mut self) -> Outcome {
        self.failures.sort_by(|a, b| a.file.cmp(&b.file));
        Outcome {
            passed: self.failures.is_empty(),
            checked: self.checked,
            failures: self.failures,
        }
    }
}

/// Aggregates an already collected set of verdicts.
pub fn aggregate(verdicts: impl IntoIterator<Item = Verdict>, policy: ReportPolicy) -> Outcome {
    let mut aggregator = Aggregator::new(policy);
    for verdict in verdicts {
        if aggregator.observe(verdict).is_break() {
            break;
        }
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn verdicts() -> Vec<Verdict> {
        vec![
            Verdict::pass("a.js"),
            Verdict::fail("c.js", "third"),
            Verdict::pass("d.js"),
            Verdict::fail("b.js", "second"),
        ]
    }

    #[test]
    fn test_all_pass() {
        let outcome = aggregate(
            vec![Verdict::pass("a.js"), Verdict::pass("b.js")],
            ReportPolicy::FailComplete,
        );
        assert!(outcome.passed);
        assert_eq!(outcome.checked, 2);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_empty_run_passes() {
        let outcome = aggregate(Vec::new(), ReportPolicy::FailFast);
        assert!(outcome.passed);
        assert_eq!(outcome.checked, 0);
    }

    #[test]
    fn test_fail_complete_reports_every_failure_sorted() {
        let outcome = aggregate(verdicts(), ReportPolicy::FailComplete);

        assert!(!outcome.passed);
        assert_eq!(outcome.checked, 4);
        assert_eq!(
            outcome.failures,
            vec![Verdict::fail("b.js", "second"), Verdict::fail("c.js", "third")]
        );
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let outcome = aggregate(verdicts(), ReportPolicy::FailFast);

        assert!(!outcome.passed);
        assert_eq!(outcome.checked, 2);
        assert_eq!(outcome.failures, vec![Verdict::fail("c.js", "third")]);
    }

    #[test]
    fn test_observe_signals_break_under_fail_fast() {
        let mut aggregator = Aggregator::new(ReportPolicy::FailFast);
        assert_eq!(
            aggregator.observe(Verdict::pass("a.js")),
            ControlFlow::Continue(())
        );
        assert_eq!(
            aggregator.observe(Verdict::fail("b.js", "x")),
            ControlFlow::Break(())
        );
        assert_eq!(
            aggregator.observe(Verdict::fail("c.js", "y")),
            ControlFlow::Break(())
        );
        assert_eq!(aggregator.finish().failures.len(), 1);
    }

    #[test]
    fn test_policy_names() {
        let fast: ReportPolicy = serde_json::from_str(r#""fail-fast""#).unwrap();
        let complete: ReportPolicy = serde_json::from_str(r#""fail-complete""#).unwrap();
        assert_eq!(fast, ReportPolicy::FailFast);
        assert_eq!(complete, ReportPolicy::FailComplete);
    }

    fn verdict_set() -> impl Strategy<Value = (Vec<Verdict>, Vec<Verdict>)> {
        prop::collection::vec(any::<bool>(), 0..24).prop_flat_map(|flags| {
            let verdicts: Vec<Verdict> = flags
                .iter()
                .enumerate()
                .map(|(i, passed)| {
                    let file = format!("f{}.js", i);
                    if *passed {
                        Verdict::pass(file)
                    } else {
                        Verdict::fail(file, "failed")
                    }
                })
                .collect();
            (Just(verdicts.clone()), Just(verdicts).prop_shuffle())
        })
    }

    proptest! {
        #[test]
        fn test_outcome_is_order_independent((ordered, shuffled) in verdict_set()) {
            for policy in [ReportPolicy::FailFast, ReportPolicy::FailComplete] {
                let a = aggregate(ordered.clone(), policy);
                let b = aggregate(shuffled.clone(), policy);
                prop_assert_eq!(a.passed, b.passed);
            }

            let a = aggregate(ordered, ReportPolicy::FailComplete);
            let b = aggregate(shuffled, ReportPolicy::FailComplete);
            prop_assert_eq!(a, b);
        }
    }
}
