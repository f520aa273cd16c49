//! Integrity gate settings.

use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;

/// Default name of the control file, relative to the configuration directory.
pub const DEFAULT_CONTROL_FILE: &str = "LINTYCHECK";

/// Repository whose commit history is consulted for the control file.
pub const DEFAULT_REPOSITORY: &str = "abcdan/linty";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The only identity allowed to update the control file.
pub const AUTHORIZED_AUTHOR: &str = "abcdan";

/// The `integrity` section of `linty.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrityConfig {
    /// Path of the control file.
    pub control_file: String,

    /// Artifacts that must be verified. Empty means every recorded entry.
    pub artifacts: Vec<String>,

    /// Digest used for the recorded checksums.
    pub hash: HashAlgorithm,

    /// `owner/repo` hosting the control file.
    pub repository: String,

    /// Base URL of the commit-history API.
    pub api_url: String,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            control_file: DEFAULT_CONTROL_FILE.to_string(),
            artifacts: Vec::new(),
            hash: HashAlgorithm::default(),
            repository: DEFAULT_REPOSITORY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
