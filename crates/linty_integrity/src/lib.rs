//! Linty integrity gate.
//!
//! Before any file is linted in strict mode, Linty checks that its own
//! trusted artifacts still match the checksums listed in a control file, and
//! that the control file was last committed by the authorized maintainer.
//!
//! This is tamper *evidence*, not a security boundary: the default digest is
//! MD5 and the authorship lookup is an unauthenticated HTTP request whose
//! response anyone on the path can forge.

pub mod author;
mod config;
mod error;
pub mod gate;
pub mod hash;
pub mod record;

pub use author::{AuthorLookup, GitHubAuthorLookup};
pub use config::{
    AUTHORIZED_AUTHOR, DEFAULT_API_URL, DEFAULT_CONTROL_FILE, DEFAULT_REPOSITORY, IntegrityConfig,
};
pub use error::{IntegrityError, LookupError};
pub use gate::{GateState, IntegrityGate};
pub use hash::{HashAlgorithm, HashError};
pub use record::IntegrityRecord;
