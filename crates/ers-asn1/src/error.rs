//! Error types for ers-asn1

use thiserror::Error;

/// Errors that can occur while decoding a DER evidence record
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not a DER EvidenceRecord
    #[error("DER error: {0}")]
    Der(#[from] der::Error),

    /// Structure is valid DER but not supported
    #[error("Unsupported evidence record: {0}")]
    Unsupported(String),

    /// Digest algorithm OID is not known
    #[error("Unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    /// No digest algorithm could be determined
    #[error("Missing digest algorithm: {0}")]
    MissingAlgorithm(String),
}

impl From<Error> for ers_types::Error {
    fn from(e: Error) -> Self {
        ers_types::Error::Decode(e.to_string())
    }
}

/// Result type for DER decoding
pub type Result<T> = std::result::Result<T, Error>;
