use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::observer::{ExclusionReason, Observer};

/// Creates every listed file (and its parent directories) under `root`.
pub fn write_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("// {}\n", file)).unwrap();
    }
}

/// Observer that keeps the events it receives.
#[derive(Default)]
pub struct RecordingObserver {
    excluded: Mutex<Vec<(PathBuf, ExclusionReason)>>,
    dispatched: Mutex<Vec<(PathBuf, String)>>,
    unmatched: Mutex<Vec<PathBuf>>,
}

impl RecordingObserver {
    pub fn exclusions(&self) -> Vec<(PathBuf, ExclusionReason)> {
        self.excluded.lock().unwrap().clone()
    }

    pub fn dispatches(&self) -> Vec<(PathBuf, String)> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn unmatched_files(&self) -> Vec<PathBuf> {
        self.unmatched.lock().unwrap().clone()
    }
}

impl Observer for RecordingObserver {
    fn excluded(&self, path: &Path, _is_dir: bool, reason: ExclusionReason) {
        self.excluded
            .lock()
            .unwrap()
            .push((path.to_path_buf(), reason));
    }

    fn dispatching(&self, path: &Path, file_type: &str, _command: &str) {
        self.dispatched
            .lock()
            .unwrap()
            .push((path.to_path_buf(), file_type.to_string()));
    }

    fn unmatched(&self, path: &Path) {
        self.unmatched.lock().unwrap().push(path.to_path_buf());
    }
}
