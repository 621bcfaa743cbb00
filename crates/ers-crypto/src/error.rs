//! Error types for ers-crypto

use ers_types::DigestAlgorithm;
use thiserror::Error;

/// Errors that can occur in digest operations
#[derive(Error, Debug)]
pub enum Error {
    /// A digest of another algorithm was passed where `expected` was required
    #[error("Algorithm mismatch: expected {expected}, got {actual}")]
    AlgorithmMismatch {
        expected: DigestAlgorithm,
        actual: DigestAlgorithm,
    },

    /// A digest value has the wrong length for its algorithm
    #[error("Invalid {algorithm} digest length: {actual} bytes")]
    InvalidLength {
        algorithm: DigestAlgorithm,
        actual: usize,
    },
}

/// Result type for digest operations
pub type Result<T> = std::result::Result<T, Error>;
