//! Integrity gate state machine.
//!
//! ```text
//! Disabled
//! ChecksumPending -> ChecksumVerified | ChecksumFailed
//! ChecksumVerified -> AuthorPending -> AuthorVerified | AuthorFailed
//! ```
//!
//! Failed states are terminal; the caller must stop before discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::author::AuthorLookup;
use crate::config::{AUTHORIZED_AUTHOR, IntegrityConfig};
use crate::error::IntegrityError;
use crate::hash::{HashAlgorithm, HashError};
use crate::record::IntegrityRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Strict mode is off; nothing was checked.
    Disabled,
    ChecksumPending,
    ChecksumVerified,
    ChecksumFailed(String),
    AuthorPending,
    AuthorVerified,
    AuthorFailed(String),
}

impl GateState {
    /// Every step ran and passed.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::AuthorVerified)
    }

    /// Linting may proceed.
    pub fn permits_run(&self) -> bool {
        matches!(self, Self::Disabled | Self::AuthorVerified)
    }

    /// Diagnostic of a failed state.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::ChecksumFailed(message) | Self::AuthorFailed(message) => Some(message),
            _ => None,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Disabled | Self::ChecksumFailed(_) | Self::AuthorVerified | Self::AuthorFailed(_)
        )
    }
}

/// Pre-flight tamper check over the control file and the artifacts it lists.
#[derive(Debug, Clone)]
pub struct IntegrityGate {
    control_file: PathBuf,
    lookup_path: String,
    artifacts: Vec<String>,
    algorithm: HashAlgorithm,
    repository: String,
}

impl IntegrityGate {
    /// `control_file` is the resolved on-disk path; artifacts are resolved
    /// against its directory.
    pub fn new(control_file: impl Into<PathBuf>, config: &IntegrityConfig) -> Self {
        Self {
            control_file: control_file.into(),
            lookup_path: config.control_file.clone(),
            artifacts: config.artifacts.clone(),
            algorithm: config.hash,
            repository: config.repository.clone(),
        }
    }

    pub fn control_file(&self) -> &Path {
        &self.control_file
    }

    /// Recomputes every artifact checksum and compares it with the record.
    pub fn verify_checksums(&self) -> Result<(), IntegrityError> {
        let record = IntegrityRecord::load(&self.control_file)?;
        if record.is_empty() {
            return Err(IntegrityError::EmptyRecord(self.control_file.clone()));
        }

        let names: Vec<&str> = if self.artifacts.is_empty() {
            record.names().collect()
        } else {
            self.artifacts.iter().map(String::as_str).collect()
        };

        let dir = self.control_file.parent().unwrap_or_else(|| Path::new("."));
        for name in names {
            let expected = record
                .get(name)
                .ok_or_else(|| IntegrityError::MissingEntry(name.to_string()))?;

            let path = dir.join(name);
            let bytes = fs::read(&path).map_err(|source| IntegrityError::Artifact { path, source })?;

            self.algorithm
                .verify(&bytes, expected)
                .map_err(|e| match e {
                    HashError::Mismatch { expected, actual } => IntegrityError::ChecksumMismatch {
                        artifact: name.to_string(),
                        expected,
                        actual,
                    },
                    HashError::InvalidFormat(value) => IntegrityError::InvalidChecksum {
                        artifact: name.to_string(),
                        value,
                    },
                })?;
            debug!("Checksum verified for {}", name);
        }

        Ok(())
    }

    /// Checks that the control file was last changed by the authorized author.
    pub async fn verify_author<L: AuthorLookup>(&self, lookup: &L) -> Result<(), IntegrityError> {
        let author = lookup
            .latest_author(&self.repository, &self.lookup_path)
            .await?;

        if author == AUTHORIZED_AUTHOR {
            Ok(())
        } else {
            Err(IntegrityError::UnauthorizedAuthor {
                file: self.lookup_path.clone(),
                actual: author,
                expected: AUTHORIZED_AUTHOR.to_string(),
            })
        }
    }

    /// Drives the state machine to a terminal state.
    pub async fn run<L: AuthorLookup>(&self, enabled: bool, lookup: &L) -> GateState {
        let mut state = if enabled {
            GateState::ChecksumPending
        } else {
            GateState::Disabled
        };

        while !state.is_terminal() {
            debug!("Integrity gate: {:?}", state);
            state = match state {
                GateState::ChecksumPending => match self.verify_checksums() {
                    Ok(()) => GateState::ChecksumVerified,
                    Err(e) => GateState::ChecksumFailed(e.to_string()),
                },
                GateState::ChecksumVerified => GateState::AuthorPending,
                GateState::AuthorPending => match self.verify_author(lookup).await {
                    Ok(()) => GateState::AuthorVerified,
                    Err(e) => GateState::AuthorFailed(e.to_string()),
                },
                terminal => terminal,
            };
        }

        debug!("Integrity gate finished: {:?}", state);
        state
    }
}
