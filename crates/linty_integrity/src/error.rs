//! Error types for the integrity gate.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for the checksum and authorship steps.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// The control file could not be read.
    #[error("Failed to read control file {path}: {source}")]
    ControlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The control file could not be written.
    #[error("Failed to write control file {path}: {source}")]
    WriteControlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The control file holds no `name|checksum` entries.
    #[error("Control file {0} lists no checksums")]
    EmptyRecord(PathBuf),

    /// A required artifact has no entry in the control file.
    #[error("No checksum recorded for file {0}")]
    MissingEntry(String),

    /// A trusted artifact could not be read.
    #[error("Failed to read file {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checksum mismatch for file {artifact}. Expected: {expected}, Actual: {actual}")]
    ChecksumMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid checksum for file {artifact}: {value}")]
    InvalidChecksum { artifact: String, value: String },

    /// No artifacts were given to checksum.
    #[error("No artifacts to checksum")]
    NoArtifacts,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{file} was last updated by {actual}, expected {expected}")]
    UnauthorizedAuthor {
        file: String,
        actual: String,
        expected: String,
    },
}

/// Error type for the remote commit-history lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Network request failed.
    #[error("Failed to fetch commit information: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error status.
    #[error("Failed to fetch commit information: HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not a commit list.
    #[error("Failed to parse commit information: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No commits found for {0}")]
    NoCommits(String),

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}
