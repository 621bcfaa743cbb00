//! Error types for ers

use thiserror::Error;

/// Errors that can occur while decoding or validating an evidence record
#[derive(Error, Debug)]
pub enum Error {
    /// Input is neither DER nor JSON
    #[error("Unrecognized evidence record encoding")]
    UnknownFormat,

    /// Model or JSON error
    #[error("Types error: {0}")]
    Types(#[from] ers_types::Error),

    /// DER decoding error
    #[error("DER decoding error: {0}")]
    Asn1(#[from] ers_asn1::Error),

    /// The record cannot be validated
    #[error("Verification error: {0}")]
    Verification(#[from] ers_verify::Error),
}

/// Result type for evidence record operations
pub type Result<T> = std::result::Result<T, Error>;
