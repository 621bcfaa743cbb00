//! Error types for ers-tsa

use thiserror::Error;

/// Errors that can occur while reading time-stamp tokens
#[derive(Error, Debug)]
pub enum Error {
    /// ASN.1 encoding error
    #[error("ASN.1 error: {0}")]
    Asn1(String),

    /// Failed to parse the token
    #[error("Failed to parse time-stamp token: {0}")]
    Parse(String),

    /// Response status is not granted
    #[error("Time-stamp response indicates failure status {0}")]
    ResponseFailure(u8),

    /// No time-stamp token in response
    #[error("No time-stamp token in response")]
    NoToken,

    /// No TSTInfo in time-stamp token
    #[error("No TSTInfo in time-stamp token")]
    NoTstInfo,

    /// Message imprint uses an unknown digest algorithm
    #[error("Unsupported message imprint algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Result type for time-stamp token operations
pub type Result<T> = std::result::Result<T, Error>;
