//! Content digests for trusted artifacts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Hash mismatch: expected {expected}, actual {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("Invalid hash format: {0}")]
    InvalidFormat(String),
}

/// Digest used for Integrity Record checksums.
///
/// MD5 is the default so existing control files keep verifying; none of the
/// choices turn the gate into a security boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    /// Length of a hex-encoded digest.
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 | Self::Blake3 => 64,
        }
    }

    /// Compute the lowercase hex digest of `bytes`.
    pub fn compute(self, bytes: &[u8]) -> String {
        match self {
            Self::Md5 => format!("{:x}", md5::compute(bytes)),
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(bytes);
                hex::encode(hasher.finalize())
            }
            Self::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        }
    }

    /// Verify that `bytes` hash to `expected`, ignoring hex case.
    pub fn verify(self, bytes: &[u8], expected: &str) -> Result<(), HashError> {
        if expected.len() != self.hex_len() || !expected.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HashError::InvalidFormat(expected.to_string()));
        }

        let actual = self.compute(bytes);

        if actual.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(HashError::Mismatch {
                expected: expected.to_string(),
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::md5(HashAlgorithm::Md5, "5eb63bbbe01eeed093cb22bb8f5acdc3")]
    #[case::sha256(
        HashAlgorithm::Sha256,
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    )]
    fn test_compute(#[case] algorithm: HashAlgorithm, #[case] expected: &str) {
        assert_eq!(algorithm.compute(b"hello world"), expected);
    }

    #[test]
    fn test_verify_case_insensitive() {
        let hash = "5EB63BBBE01EEED093CB22BB8F5ACDC3";
        assert!(HashAlgorithm::Md5.verify(b"hello world", hash).is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        let hash = "4eb63bbbe01eeed093cb22bb8f5acdc3";
        match HashAlgorithm::Md5.verify(b"hello world", hash) {
            Err(HashError::Mismatch { expected, actual }) => {
                assert_eq!(expected, hash);
                assert_eq!(actual, "5eb63bbbe01eeed093cb22bb8f5acdc3");
            }
            other => panic!("Expected Mismatch error, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_rejects_digest_of_other_algorithm() {
        let md5 = HashAlgorithm::Md5.compute(b"hello world");
        assert!(matches!(
            HashAlgorithm::Sha256.verify(b"hello world", &md5),
            Err(HashError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_algorithm_names() {
        let parsed: HashAlgorithm = serde_json::from_str(r#""blake3""#).unwrap();
        assert_eq!(parsed, HashAlgorithm::Blake3);
        assert!(serde_json::from_str::<HashAlgorithm>(r#""crc32""#).is_err());
    }

    use proptest::prelude::*;

    fn algorithm() -> impl Strategy<Value = HashAlgorithm> {
        prop_oneof![
            Just(HashAlgorithm::Md5),
            Just(HashAlgorithm::Sha256),
            Just(HashAlgorithm::Blake3),
        ]
    }

    proptest! {
        #[test]
        fn test_compute_returns_lowercase_hex(algorithm in algorithm(), bytes in any::<Vec<u8>>()) {
            let hash = algorithm.compute(&bytes);

            prop_assert_eq!(hash.len(), algorithm.hex_len());
            prop_assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
            prop_assert!(hash.chars().all(|c| !c.is_ascii_uppercase()));
        }

        #[test]
        fn test_verify_accepts_own_digest(algorithm in algorithm(), bytes in any::<Vec<u8>>()) {
            let hash = algorithm.compute(&bytes);
            prop_assert!(algorithm.verify(&bytes, &hash).is_ok());
            prop_assert!(algorithm.verify(&bytes, &hash.to_uppercase()).is_ok());
        }
    }
}
