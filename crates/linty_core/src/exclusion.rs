//! Exclusion filter.
//!
//! Three sources are consulted in order and the first match wins:
//!
//! 1. `.gitignore` rules at the scan root (when enabled)
//! 2. configured ignore patterns
//! 3. reserved control-metadata directories
//!
//! A malformed pattern never aborts a walk; it is reported once and then
//! treated as a non-match.

use std::path::{Component, Path};

use globset::{Glob, GlobMatcher};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::warn;

use crate::config::LintyConfig;
use crate::observer::{ExclusionReason, SharedObserver};

/// Name of the version-control ignore file read from the scan root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Directory names that are never linted.
pub const RESERVED_DIRS: &[&str] = &[".github", ".git"];

/// Decides whether a path relative to the scan root is left out.
pub struct ExclusionFilter {
    gitignore: Option<Gitignore>,
    dir_prefixes: Vec<String>,
    name_globs: Vec<GlobMatcher>,
    observer: SharedObserver,
}

impl ExclusionFilter {
    /// Builds the filter for `root` from the configuration.
    pub fn new(root: &Path, config: &LintyConfig, observer: SharedObserver) -> Self {
        let gitignore = if config.gitignore {
            load_gitignore(root)
        } else {
            None
        };
        Self::from_parts(gitignore, &config.ignore, observer)
    }

    /// Builds the filter from an already compiled ignore set.
    pub fn from_parts(
        gitignore: Option<Gitignore>,
        patterns: &[String],
        observer: SharedObserver,
    ) -> Self {
        let mut dir_prefixes = Vec::new();
        let mut name_globs = Vec::new();

        for pattern in patterns {
            if pattern.ends_with('/') {
                dir_prefixes.push(pattern.clone());
                continue;
            }
            match Glob::new(pattern) {
                Ok(glob) => name_globs.push(glob.compile_matcher()),
                Err(e) => warn!("Invalid ignore pattern {:?}: {}", pattern, e),
            }
        }

        Self {
            gitignore,
            dir_prefixes,
            name_globs,
            observer,
        }
    }

    /// Returns why `path` is excluded, or `None` if it survives every source.
    pub fn check(&self, path: &Path, is_dir: bool) -> Option<ExclusionReason> {
        if let Some(gitignore) = &self.gitignore
            && gitignore.matched(path, is_dir).is_ignore()
        {
            return Some(ExclusionReason::VersionControl);
        }

        if is_dir {
            let dir = format!("{}/", to_slash(path));
            if self.dir_prefixes.iter().any(|p| dir.starts_with(p.as_str())) {
                return Some(ExclusionReason::Pattern);
            }
        } else if let Some(name) = path.file_name()
            && self.name_globs.iter().any(|g| g.is_match(name))
        {
            return Some(ExclusionReason::Pattern);
        }

        if is_reserved(path) {
            return Some(ExclusionReason::Reserved);
        }

        None
    }

    /// Whether `path` should be left out. Excluded directories are pruned by
    /// the caller.
    pub fn should_exclude(&self, path: &Path, is_dir: bool) -> bool {
        match self.check(path, is_dir) {
            Some(reason) => {
                self.observer.excluded(path, is_dir, reason);
                true
            }
            None => false,
        }
    }
}

/// Compiles `<root>/.gitignore`. A missing or unreadable file yields no rules.
pub fn load_gitignore(root: &Path) -> Option<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    if let Some(e) = builder.add(root.join(GITIGNORE_FILE)) {
        warn!("Failed to read {}: {}", GITIGNORE_FILE, e);
        return None;
    }
    match builder.build() {
        Ok(gitignore) => Some(gitignore),
        Err(e) => {
            warn!("Failed to compile {}: {}", GITIGNORE_FILE, e);
            None
        }
    }
}

fn is_reserved(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => RESERVED_DIRS.iter().any(|r| name == *r),
        _ => false,
    })
}

/// Renders a relative path with `/` separators on every platform.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
