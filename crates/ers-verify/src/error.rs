//! Error types for ers-verify

use thiserror::Error;

/// Errors that stop validation of a record
///
/// Digest mismatches, missing material and broken renewal links are not
/// errors; they are reported in the validation result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The decoded record is not a usable evidence record
    #[error("Structural error: {0}")]
    Structure(String),
}

impl Error {
    /// A malformed hash tree at `chain`/`index`
    pub(crate) fn hash_tree(chain: usize, index: usize, source: ers_hashtree::Error) -> Self {
        Error::Structure(format!("archive time-stamp {}/{}: {}", chain, index, source))
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
