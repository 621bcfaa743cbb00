//! Evidence Record verification
//!
//! This is the main entry point for the Evidence Record Rust implementation.
//! It decodes RFC 4998 records (DER or the JSON form of the model) and
//! validates them against the data objects supplied by the caller.

pub mod error;
pub mod verify;

// Re-export core crates
pub use ers_asn1 as asn1;
pub use ers_crypto as crypto;
pub use ers_hashtree as hashtree;
pub use ers_tsa as tsa;
pub use ers_types as types;

pub use error::{Error, Result};
pub use ers_verify::{
    EvidenceRecordValidation, EvidenceRecordValidator, RenewalDigestInput, TimestampValidation,
    UnmatchedObjectPolicy, ValidationPolicy,
};
pub use verify::{decode, validate_der, validate_json, RecordFormat, Verifier};
