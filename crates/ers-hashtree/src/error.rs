//! Error types for ers-hashtree

use thiserror::Error;

/// Errors that make a reduced hash tree unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The tree has no levels
    #[error("Hash tree is empty")]
    EmptyTree,

    /// A level holds no digest values
    #[error("Malformed hash tree: level {level} is empty")]
    EmptyGroup { level: usize },

    /// A stored value does not have the algorithm's digest length
    #[error("Malformed hash tree: value {position} at level {level} is {actual} bytes, expected {expected}")]
    InvalidDigestLength {
        level: usize,
        position: usize,
        expected: usize,
        actual: usize,
    },
}

/// Result type for hash tree operations
pub type Result<T> = std::result::Result<T, Error>;
