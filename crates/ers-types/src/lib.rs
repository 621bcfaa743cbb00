//! Core types and data structures for Evidence Record verification
//!
//! This crate provides the encoding-agnostic object model produced by a decoder
//! (RFC 4998 ASN.1, RFC 6283 XML, or JSON), the material a caller supplies for
//! validation, and the output units produced by the verification engine.

pub mod decoder;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod material;
pub mod record;
pub mod validation;

pub use decoder::{EvidenceRecordDecoder, JsonDecoder};
pub use digest::{Digest, DigestAlgorithm};
pub use encoding::Hex;
pub use error::{Error, Result};
pub use material::{DataObject, DataObjectContent, Manifest, ManifestEntry, ValidationMaterial};
pub use record::{
    ArchiveTimeStamp, ArchiveTimeStampChain, CryptographicInformation,
    CryptographicInformationType, DigestValueGroup, EvidenceRecord, TimestampToken,
};
pub use validation::{
    EvidenceRecordTimestampType, ReferenceType, ReferenceValidation, TimestampedObjectCategory,
    TimestampedReference,
};
