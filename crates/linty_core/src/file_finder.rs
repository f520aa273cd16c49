//! Candidate file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LintyConfig;
use crate::error::LinterError;
use crate::exclusion::ExclusionFilter;
use crate::observer::SharedObserver;

/// What to do with a directory entry that cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkErrorPolicy {
    /// Fail the whole discovery. A partial file set would silently
    /// under-lint the tree.
    #[default]
    Abort,
    /// Log the entry and keep walking.
    Skip,
}

/// Walks a scan root and yields the files that survive the exclusion filter.
///
/// Entries are visited depth-first in file-name order, so the candidate list
/// is stable for an unchanged tree. Symbolic links are not followed.
pub struct FileFinder {
    root: PathBuf,
    filter: ExclusionFilter,
    on_error: WalkErrorPolicy,
    observer: SharedObserver,
}

impl FileFinder {
    pub fn new(root: impl Into<PathBuf>, config: &LintyConfig, observer: SharedObserver) -> Self {
        let root = root.into();
        let filter = ExclusionFilter::new(&root, config, observer.clone());
        Self::with_filter(root, filter, config.on_walk_error, observer)
    }

    pub fn with_filter(
        root: impl Into<PathBuf>,
        filter: ExclusionFilter,
        on_error: WalkErrorPolicy,
        observer: SharedObserver,
    ) -> Self {
        Self {
            root: root.into(),
            filter,
            on_error,
            observer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovers candidate files, returned relative to the root.
    pub fn discover_files(&self) -> Result<Vec<PathBuf>, LinterError> {
        if let Err(e) = fs::read_dir(&self.root) {
            return Err(LinterError::discovery(&self.root, e.to_string()));
        }

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let relative = self.relative(entry.path());
                !self
                    .filter
                    .should_exclude(relative, entry.file_type().is_dir())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => match self.on_error {
                    WalkErrorPolicy::Abort => {
                        return Err(LinterError::discovery(&self.root, e.to_string()));
                    }
                    WalkErrorPolicy::Skip => {
                        warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                },
            };

            if entry.depth() == 0 || !entry.file_type().is_file() {
                continue;
            }

            let relative = self.relative(entry.path()).to_path_buf();
            self.observer.discovered(&relative);
            files.push(relative);
        }

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Discovers the candidate files under `root`.
pub fn discover(
    root: impl Into<PathBuf>,
    config: &LintyConfig,
    observer: SharedObserver,
) -> Result<Vec<PathBuf>, LinterError> {
    FileFinder::new(root, config, observer).discover_files()
}
