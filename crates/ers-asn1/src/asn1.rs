//! ASN.1 types for RFC 4998 Evidence Records
//!
//! ```text
//! EvidenceRecord ::= SEQUENCE {
//!   version                   INTEGER { v1(1) } ,
//!   digestAlgorithms          SEQUENCE OF AlgorithmIdentifier,
//!   cryptoInfos               [0] CryptoInfos OPTIONAL,
//!   encryptionInfo            [1] EncryptionInfo OPTIONAL,
//!   archiveTimeStampSequence  ArchiveTimeStampSequence }
//!
//! ArchiveTimeStamp ::= SEQUENCE {
//!   digestAlgorithm [0] AlgorithmIdentifier OPTIONAL,
//!   attributes      [1] Attributes OPTIONAL,
//!   reducedHashtree [2] SEQUENCE OF PartialHashtree OPTIONAL,
//!   timeStamp       ContentInfo }
//!
//! PartialHashtree ::= SEQUENCE OF OCTET STRING
//! ArchiveTimeStampChain ::= SEQUENCE OF ArchiveTimeStamp
//! ArchiveTimeStampSequence ::= SEQUENCE OF ArchiveTimeStampChain
//! ```
//! The module uses implicit tagging.

use cms::content_info::ContentInfo;
use der::asn1::OctetString;
use der::{Any, Decode, Encode, Sequence};
use ers_tsa::AlgorithmIdentifier;
use x509_cert::attr::Attribute;

/// `SEQUENCE OF OCTET STRING`
pub type PartialHashtree = Vec<OctetString>;

/// `ArchiveTimeStampChain`
pub type ArchiveTimeStampChainAsn1 = Vec<ArchiveTimeStampAsn1>;

/// `ArchiveTimeStamp`
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct ArchiveTimeStampAsn1 {
    /// Digest algorithm of the reduced hash tree
    #[asn1(context_specific = "0", optional = "true", tag_mode = "IMPLICIT")]
    pub digest_algorithm: Option<AlgorithmIdentifier>,
    /// Unsigned attributes
    #[asn1(context_specific = "1", optional = "true", tag_mode = "IMPLICIT")]
    pub attributes: Option<Vec<Attribute>>,
    /// Reduced hash tree, leaf level first
    #[asn1(context_specific = "2", optional = "true", tag_mode = "IMPLICIT")]
    pub reduced_hashtree: Option<Vec<PartialHashtree>>,
    /// RFC 3161 time-stamp token
    pub time_stamp: ContentInfo,
}

/// `EvidenceRecord`
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct EvidenceRecordAsn1 {
    /// Syntax version, 1
    pub version: u8,
    /// Algorithms used anywhere in the record
    pub digest_algorithms: Vec<AlgorithmIdentifier>,
    /// Certificates and revocation data
    #[asn1(context_specific = "0", optional = "true", tag_mode = "IMPLICIT")]
    pub crypto_infos: Option<Vec<Attribute>>,
    /// Encryption parameters, present only for encrypted content
    #[asn1(context_specific = "1", optional = "true", tag_mode = "IMPLICIT")]
    pub encryption_info: Option<Vec<Any>>,
    /// Chains, oldest first
    pub archive_time_stamp_sequence: Vec<ArchiveTimeStampChainAsn1>,
}

impl EvidenceRecordAsn1 {
    /// Decode from DER bytes
    pub fn from_der_bytes(bytes: &[u8]) -> Result<Self, der::Error> {
        Self::from_der(bytes)
    }

    /// Encode to DER
    pub fn to_der_bytes(&self) -> Result<Vec<u8>, der::Error> {
        self.to_der()
    }
}
