//! Linty configuration (`linty.json`).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use jsonschema::Validator;
use linty_integrity::IntegrityConfig;
use serde::{Deserialize, Serialize};

use crate::LinterError;
use crate::aggregator::ReportPolicy;
use crate::checker::Protocol;
use crate::classifier::UnmatchedPolicy;
use crate::file_finder::WalkErrorPolicy;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration for a lint run.
///
/// Loaded once at startup and shared read-only with every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintyConfig {
    /// Number of parallel checker invocations.
    #[serde(default = "default_concurrency", alias = "workers")]
    pub concurrency: usize,

    /// Whether to honour `<root>/.gitignore`.
    #[serde(default, alias = "useVersionControlIgnore")]
    pub gitignore: bool,

    /// Ignore patterns. A trailing `/` marks a directory-prefix rule,
    /// anything else is a glob matched against the file name.
    #[serde(default, alias = "ignorePatterns")]
    pub ignore: Vec<String>,

    /// Whether to report every discovery and dispatch event.
    #[serde(default)]
    pub verbose: bool,

    /// Enables the integrity gate.
    #[serde(default, alias = "strictMode")]
    pub secure: bool,

    /// Ordered classification rules. The first matching rule wins.
    #[serde(default, alias = "rules")]
    pub lint: Vec<LintRule>,

    /// Result protocol used by rules that do not override it.
    #[serde(default)]
    pub protocol: Protocol,

    /// Command prefix placed before the checker path, e.g. `["node"]`.
    #[serde(default)]
    pub runner: Vec<String>,

    /// Checker for files no rule matches. When absent those files pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackChecker>,

    /// How failures are collected.
    #[serde(default)]
    pub report: ReportPolicy,

    /// What to do when a directory entry cannot be read.
    #[serde(default, rename = "onWalkError")]
    pub on_walk_error: WalkErrorPolicy,

    /// Per-checker timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Integrity gate settings, only consulted when `secure` is set.
    #[serde(default)]
    pub integrity: IntegrityConfig,

    /// Directory the configuration was read from. Checker scripts and the
    /// integrity control file are resolved against it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_concurrency() -> usize {
    1
}

/// A classification rule: files whose path matches `regex` are handed to
/// the checker named by `linter` (or `type` when no linter is given).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LintRule {
    #[serde(rename = "type")]
    pub file_type: String,

    pub regex: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

impl LintRule {
    pub fn new(file_type: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            regex: regex.into(),
            linter: None,
            protocol: None,
        }
    }

    pub fn with_linter(mut self, linter: impl Into<String>) -> Self {
        self.linter = Some(linter.into());
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Name of the checker responsible for this rule.
    pub fn checker(&self) -> &str {
        self.linter.as_deref().unwrap_or(&self.file_type)
    }
}

/// The generic checker unmatched files are routed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackChecker {
    #[serde(rename = "type", default = "default_fallback_type")]
    pub file_type: String,

    pub linter: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
}

fn default_fallback_type() -> String {
    "fallback".to_string()
}

impl LintyConfig {
    /// Name of the configuration file inside the configuration directory.
    pub const CONFIG_FILE: &'static str = "linty.json";

    /// Creates a configuration with every field at its default.
    pub fn new() -> Self {
        Self {
            concurrency: default_concurrency(),
            gitignore: false,
            ignore: Vec::new(),
            verbose: false,
            secure: false,
            lint: Vec::new(),
            protocol: Protocol::default(),
            runner: Vec::new(),
            fallback: None,
            report: ReportPolicy::default(),
            on_walk_error: WalkErrorPolicy::default(),
            timeout: None,
            integrity: IntegrityConfig::default(),
            base_dir: None,
        }
    }

    /// Loads `linty.json` from the given configuration directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, LinterError> {
        Self::from_file(dir.as_ref().join(Self::CONFIG_FILE))
    }

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            config.base_dir = Some(parent.canonicalize().unwrap_or_else(|_| parent.to_path_buf()));
        }

        Ok(config)
    }

    /// Parses configuration from JSON string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| LinterError::config(format!("Failed to parse config: {}", e)))?;

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| LinterError::Internal(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            return Err(LinterError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        let config: Self = serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))?;

        if config.concurrency == 0 {
            return Err(LinterError::config("concurrency must be at least 1"));
        }

        Ok(config)
    }

    /// Number of dispatch workers, never less than one.
    pub fn worker_count(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Policy applied to files no rule matches.
    pub fn unmatched_policy(&self) -> UnmatchedPolicy {
        match &self.fallback {
            Some(fallback) => UnmatchedPolicy::Fallback(fallback.clone()),
            None => UnmatchedPolicy::AutoPass,
        }
    }

    /// Per-checker timeout, if configured.
    pub fn checker_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Resolves a checker name to something that can be spawned.
    ///
    /// A checker that exists as a file inside the configuration directory is
    /// returned as an absolute path; anything else is used verbatim so it can
    /// be looked up on `PATH`.
    pub fn resolve_checker(&self, checker: &str) -> PathBuf {
        if let Some(base) = &self.base_dir {
            let candidate = base.join(checker);
            if candidate.is_file() {
                return candidate.canonicalize().unwrap_or(candidate);
            }
        }
        PathBuf::from(checker)
    }

    /// Location of the integrity control file.
    pub fn control_file_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(&self.integrity.control_file),
            None => PathBuf::from(&self.integrity.control_file),
        }
    }
}

impl Default for LintyConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_config_new() {
        let config = LintyConfig::new();
        assert_eq!(config.concurrency, 1);
        assert!(!config.gitignore);
        assert!(!config.secure);
        assert!(config.lint.is_empty());
        assert_eq!(config.protocol, Protocol::Structured);
        assert_eq!(config.report, ReportPolicy::FailComplete);
        assert_eq!(config.on_walk_error, WalkErrorPolicy::Abort);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "workers": 4,
            "gitignore": true,
            "ignore": ["node_modules/", "*.min.js"],
            "verbose": true,
            "secure": false,
            "lint": [
                { "type": "style", "regex": "\\.js$", "linter": "style.js" },
                { "type": "go", "regex": "\\.go$", "protocol": "boolean" }
            ]
        }"#;

        let config = LintyConfig::from_json(json).unwrap();
        assert_eq!(config.concurrency, 4);
        assert!(config.gitignore);
        assert_eq!(config.ignore, vec!["node_modules/", "*.min.js"]);
        assert!(config.verbose);
        assert_eq!(config.lint.len(), 2);
        assert_eq!(config.lint[0].checker(), "style.js");
        assert_eq!(config.lint[1].checker(), "go");
        assert_eq!(config.lint[1].protocol, Some(Protocol::Boolean));
    }

    #[test]
    fn test_config_canonical_aliases() {
        let json = r#"{
            "concurrency": 2,
            "strictMode": true,
            "useVersionControlIgnore": true,
            "ignorePatterns": ["dist/"],
            "rules": [{ "type": "style", "regex": "\\.css$" }]
        }"#;

        let config = LintyConfig::from_json(json).unwrap();
        assert_eq!(config.worker_count(), 2);
        assert!(config.secure);
        assert!(config.gitignore);
        assert_eq!(config.ignore, vec!["dist/"]);
        assert_eq!(config.lint[0].file_type, "style");
    }

    #[test]
    fn test_unset_concurrency_degenerates_to_one_worker() {
        let config = LintyConfig::from_json("{}").unwrap();
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_unmatched_policy() {
        let config = LintyConfig::from_json("{}").unwrap();
        assert_eq!(config.unmatched_policy(), UnmatchedPolicy::AutoPass);

        let config =
            LintyConfig::from_json(r#"{ "fallback": { "linter": "generic.sh" } }"#).unwrap();
        match config.unmatched_policy() {
            UnmatchedPolicy::Fallback(fallback) => {
                assert_eq!(fallback.file_type, "fallback");
                assert_eq!(fallback.linter, "generic.sh");
            }
            other => panic!("Expected fallback policy, got {:?}", other),
        }
    }

    #[test]
    fn test_from_dir_sets_base_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("linty.json"), r#"{ "lint": [] }"#).unwrap();
        fs::write(dir.path().join("check.sh"), "echo true").unwrap();

        let config = LintyConfig::from_dir(dir.path()).unwrap();
        let base = config.base_dir.clone().unwrap();
        assert_eq!(base, dir.path().canonicalize().unwrap());

        assert_eq!(config.resolve_checker("check.sh"), base.join("check.sh"));
        assert_eq!(config.resolve_checker("eslint"), PathBuf::from("eslint"));
        assert_eq!(config.control_file_path(), base.join("LINTYCHECK"));
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempdir().unwrap();
        let err = LintyConfig::from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[rstest]
    #[case::invalid_json(r#"{ "lint": "#, "Failed to parse config")]
    #[case::unknown_property(r#"{ "lints": [] }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "gitignore": "yes" }"#, "Config validation failed")]
    #[case::zero_workers(r#"{ "workers": 0 }"#, "Config validation failed")]
    #[case::missing_regex(r#"{ "lint": [{ "type": "style" }] }"#, "Config validation failed")]
    #[case::invalid_protocol(r#"{ "protocol": "xml" }"#, "Config validation failed")]
    #[case::invalid_hash(r#"{ "integrity": { "hash": "crc32" } }"#, "Config validation failed")]
    #[case::zero_timeout(r#"{ "timeout": 0 }"#, "Config validation failed")]
    #[case::huge_timeout(r#"{ "timeout": 18446744073709551615 }"#, "Config validation failed")]
    #[case::workers_and_concurrency(r#"{ "workers": 2, "concurrency": 4 }"#, "workers")]
    #[case::both_gitignore_keys(
        r#"{ "gitignore": true, "useVersionControlIgnore": false }"#,
        "Config validation failed"
    )]
    #[case::both_ignore_keys(r#"{ "ignore": [], "ignorePatterns": [] }"#, "Config validation failed")]
    #[case::both_strict_keys(r#"{ "secure": true, "strictMode": true }"#, "Config validation failed")]
    #[case::both_rule_keys(r#"{ "lint": [], "rules": [] }"#, "Config validation failed")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let result = LintyConfig::from_json(json);
        assert!(result.is_err(), "Expected error for JSON: {}", json);
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }
}
