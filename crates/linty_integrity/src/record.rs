//! Integrity Record: the `name|checksum` control file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::IntegrityError;
use crate::hash::HashAlgorithm;

const SEPARATOR: char = '|';

/// Expected checksums of trusted artifacts, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityRecord {
    entries: Vec<(String, String)>,
}

impl IntegrityRecord {
    /// Parses control-file content.
    ///
    /// Lines that do not split into exactly a name and a checksum are
    /// skipped. A repeated name keeps its last checksum.
    pub fn parse(content: &str) -> Self {
        let mut record = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split(SEPARATOR).map(str::trim).collect();
            match parts.as_slice() {
                [name, checksum] if !name.is_empty() && !checksum.is_empty() => {
                    record.insert(*name, *checksum);
                }
                _ => debug!("Skipping malformed control file line: {:?}", line),
            }
        }
        record
    }

    pub fn load(path: &Path) -> Result<Self, IntegrityError> {
        let content = fs::read_to_string(path).map_err(|source| IntegrityError::ControlFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Computes a record for `artifacts`, resolved against `dir`.
    pub fn generate(
        dir: &Path,
        artifacts: &[String],
        algorithm: HashAlgorithm,
    ) -> Result<Self, IntegrityError> {
        if artifacts.is_empty() {
            return Err(IntegrityError::NoArtifacts);
        }

        let mut record = Self::default();
        for name in artifacts {
            let path = dir.join(name);
            let bytes = fs::read(&path).map_err(|source| IntegrityError::Artifact { path, source })?;
            record.insert(name.as_str(), algorithm.compute(&bytes));
        }
        Ok(record)
    }

    pub fn insert(&mut self, name: impl Into<String>, checksum: impl Into<String>) {
        let name = name.into();
        let checksum = checksum.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = checksum,
            None => self.entries.push((name, checksum)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, checksum)| checksum.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Control-file text, one `name|checksum` line per entry.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, checksum)| format!("{}{}{}\n", name, SEPARATOR, checksum))
            .collect()
    }

    pub fn write(&self, path: &Path) -> Result<(), IntegrityError> {
        fs::write(path, self.render()).map_err(|source| IntegrityError::WriteControlFile {
            path: path.to_path_buf(),
            source,
        })
    }
}
