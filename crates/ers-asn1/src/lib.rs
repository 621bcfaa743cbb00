//! RFC 4998 Evidence Record decoding
//!
//! This crate maps the DER `EvidenceRecord` structure onto the
//! encoding-agnostic model of `ers-types`, keeping the DER encodings of each
//! archive time-stamp and chain so renewal links can be recomputed.

pub mod asn1;
pub mod decoder;
pub mod error;

pub use asn1::{ArchiveTimeStampAsn1, EvidenceRecordAsn1, PartialHashtree};
pub use decoder::Rfc4998Decoder;
pub use error::{Error, Result};
