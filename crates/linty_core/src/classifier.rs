//! Linter classification.
//!
//! Maps a candidate file to the checker responsible for it. Rules are tried
//! in configuration order and the first whose regular expression matches the
//! path wins.

use std::path::Path;

use regex::Regex;
use tracing::warn;

use crate::checker::Protocol;
use crate::config::{FallbackChecker, LintRule, LintyConfig};
use crate::exclusion::to_slash;
use crate::observer::SharedObserver;

/// What happens to a file no rule matches.
#[derive(Debug, Clone, PartialEq)]
pub enum UnmatchedPolicy {
    /// The file passes without running any checker.
    AutoPass,
    /// The file is handed to a generic checker.
    Fallback(FallbackChecker),
}

/// A resolved checker assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch<'a> {
    pub file_type: &'a str,
    pub checker: &'a str,
    pub protocol: Protocol,
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Check(Dispatch<'a>),
    AutoPass,
}

struct CompiledRule {
    rule: LintRule,
    // `None` when the expression failed to compile; such a rule never matches.
    regex: Option<Regex>,
}

pub struct Classifier {
    rules: Vec<CompiledRule>,
    protocol: Protocol,
    unmatched: UnmatchedPolicy,
    observer: SharedObserver,
}

impl Classifier {
    pub fn new(
        rules: &[LintRule],
        protocol: Protocol,
        unmatched: UnmatchedPolicy,
        observer: SharedObserver,
    ) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let regex = match Regex::new(&rule.regex) {
                    Ok(regex) => Some(regex),
                    Err(e) => {
                        warn!(
                            "Invalid regex {:?} for rule '{}': {}",
                            rule.regex, rule.file_type, e
                        );
                        None
                    }
                };
                CompiledRule {
                    rule: rule.clone(),
                    regex,
                }
            })
            .collect();

        Self {
            rules,
            protocol,
            unmatched,
            observer,
        }
    }

    pub fn from_config(config: &LintyConfig, observer: SharedObserver) -> Self {
        Self::new(
            &config.lint,
            config.protocol,
            config.unmatched_policy(),
            observer,
        )
    }

    /// Returns the first rule matching `path`.
    pub fn matching_rule(&self, path: &Path) -> Option<&LintRule> {
        let subject = to_slash(path);
        self.rules
            .iter()
            .find(|compiled| {
                compiled
                    .regex
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(&subject))
            })
            .map(|compiled| &compiled.rule)
    }

    /// Returns the file-type tag of the first rule matching `path`.
    pub fn classify(&self, path: &Path) -> Option<&str> {
        self.matching_rule(path).map(|rule| rule.file_type.as_str())
    }

    /// Decides how `path` is checked, applying the unmatched-file policy.
    pub fn route(&self, path: &Path) -> Route<'_> {
        if let Some(rule) = self.matching_rule(path) {
            return Route::Check(Dispatch {
                file_type: &rule.file_type,
                checker: rule.checker(),
                protocol: rule.protocol.unwrap_or(self.protocol),
            });
        }

        self.observer.unmatched(path);
        match &self.unmatched {
            UnmatchedPolicy::AutoPass => Route::AutoPass,
            UnmatchedPolicy::Fallback(fallback) => Route::Check(Dispatch {
                file_type: &fallback.file_type,
                checker: &fallback.linter,
                protocol: fallback.protocol.unwrap_or(self.protocol),
            }),
        }
    }
}
