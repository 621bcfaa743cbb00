//! Error types for ers-types

use thiserror::Error;

/// Errors that can occur in ers-types
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid encoding (hex, base64, length)
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Unknown or unsupported digest algorithm
    #[error("Invalid digest algorithm: {0}")]
    InvalidDigestAlgorithm(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Decoder error
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for ers-types operations
pub type Result<T> = std::result::Result<T, Error>;
