//! RFC 3161 time-stamp tokens for Evidence Record verification
//!
//! This crate parses the time-stamp tokens embedded in archive time-stamps
//! and defines the validator interface the verification engine calls with
//! the digest each token is expected to attest to.

pub mod asn1;
pub mod error;
pub mod parse;
pub mod validator;

pub use asn1::{AlgorithmIdentifier, Asn1MessageImprint, PkiStatus, TimeStampResp, TstInfo};
pub use error::{Error, Result};
pub use parse::{decode_token, parse_timestamp_token, ParsedToken};
pub use validator::{ImprintValidator, SignatureStatus, TimestampTokenValidator, TokenValidation};
