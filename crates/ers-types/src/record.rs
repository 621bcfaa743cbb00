//! Evidence record object model
//!
//! The model is encoding-agnostic: the RFC 4998 DER decoder, the JSON decoder
//! and test fixtures all produce the same structures. Everything here is
//! read-only input to a validation run.

use crate::digest::{Digest, DigestAlgorithm};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field that may be null as the default value
fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

fn default_version() -> u8 {
    1
}

/// The root proof object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    /// Caller-visible identifier, used for scope reporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Syntax version (1 for RFC 4998)
    #[serde(default = "default_version")]
    pub version: u8,
    /// Chronologically ordered chains
    pub archive_time_stamp_sequence: Vec<ArchiveTimeStampChain>,
    /// Record-level certificates and revocation data
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub cryptographic_information: Vec<CryptographicInformation>,
}

impl EvidenceRecord {
    /// Create a record from its chains
    pub fn new(archive_time_stamp_sequence: Vec<ArchiveTimeStampChain>) -> Self {
        Self {
            id: None,
            version: default_version(),
            archive_time_stamp_sequence,
            cryptographic_information: Vec::new(),
        }
    }

    /// Set the record identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse a record from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Json)
    }

    /// Serialize the record to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Json)
    }

    /// Serialize the record to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::Json)
    }

    /// Total number of archive time-stamps across all chains
    pub fn timestamp_count(&self) -> usize {
        self.archive_time_stamp_sequence
            .iter()
            .map(|chain| chain.archive_time_stamps.len())
            .sum()
    }

    /// Iterate `(chain_index, index, archive_time_stamp)` in sequence order
    pub fn archive_time_stamps(&self) -> impl Iterator<Item = (usize, usize, &ArchiveTimeStamp)> {
        self.archive_time_stamp_sequence
            .iter()
            .enumerate()
            .flat_map(|(c, chain)| {
                chain
                    .archive_time_stamps
                    .iter()
                    .enumerate()
                    .map(move |(i, ats)| (c, i, ats))
            })
    }

    /// Distinct digest algorithms used by the chains, in order of first use
    pub fn digest_algorithms(&self) -> Vec<DigestAlgorithm> {
        let mut algorithms = Vec::new();
        for chain in &self.archive_time_stamp_sequence {
            if !algorithms.contains(&chain.digest_algorithm) {
                algorithms.push(chain.digest_algorithm);
            }
        }
        algorithms
    }
}

/// An ordered run of archive time-stamps sharing one digest algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveTimeStampChain {
    /// Digest algorithm of the chain
    pub digest_algorithm: DigestAlgorithm,
    /// Archive time-stamps, oldest first
    pub archive_time_stamps: Vec<ArchiveTimeStamp>,
    /// Encoded form of the chain as it appeared in the container
    #[serde(
        default,
        with = "crate::encoding::base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub encoded: Vec<u8>,
}

impl ArchiveTimeStampChain {
    /// Create a chain
    pub fn new(digest_algorithm: DigestAlgorithm, archive_time_stamps: Vec<ArchiveTimeStamp>) -> Self {
        Self {
            digest_algorithm,
            archive_time_stamps,
            encoded: Vec::new(),
        }
    }

    /// The last archive time-stamp of the chain
    pub fn last(&self) -> Option<&ArchiveTimeStamp> {
        self.archive_time_stamps.last()
    }
}

/// One reduced hash tree plus the time-stamp token that attests to its root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveTimeStamp {
    /// Digest algorithm declared by the time-stamp; falls back to the chain's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<DigestAlgorithm>,
    /// Reduced hash tree, leaf level first. Empty when the tree was omitted.
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub hash_tree: Vec<DigestValueGroup>,
    /// The time-stamp token over the tree root
    pub timestamp: TimestampToken,
    /// Encoded form of the whole archive time-stamp
    #[serde(
        default,
        with = "crate::encoding::base64_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub encoded: Vec<u8>,
    /// Certificates and revocation data attached to this time-stamp
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub cryptographic_information: Vec<CryptographicInformation>,
}

impl ArchiveTimeStamp {
    /// Create an archive time-stamp
    pub fn new(hash_tree: Vec<DigestValueGroup>, timestamp: TimestampToken) -> Self {
        Self {
            digest_algorithm: None,
            hash_tree,
            timestamp,
            encoded: Vec::new(),
            cryptographic_information: Vec::new(),
        }
    }

    /// Effective digest algorithm inside `chain`
    pub fn algorithm_in(&self, chain: &ArchiveTimeStampChain) -> DigestAlgorithm {
        self.digest_algorithm.unwrap_or(chain.digest_algorithm)
    }

    /// Whether a reduced hash tree is present
    pub fn has_hash_tree(&self) -> bool {
        !self.hash_tree.is_empty()
    }

    /// Leaf level of the tree
    pub fn level_zero(&self) -> Option<&DigestValueGroup> {
        self.hash_tree.first()
    }

    /// Bytes that identify this archive time-stamp when it is renewed.
    ///
    /// Falls back to the token encoding when the container did not preserve
    /// the archive time-stamp encoding.
    pub fn encoded_or_token(&self) -> &[u8] {
        if self.encoded.is_empty() {
            &self.timestamp.encoded
        } else {
            &self.encoded
        }
    }
}

/// Sibling digests at one level of a reduced hash tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestValueGroup {
    /// Digest values as stored
    #[serde(with = "crate::encoding::base64_bytes_list")]
    pub digest_values: Vec<Vec<u8>>,
}

impl DigestValueGroup {
    /// Create a group
    pub fn new(digest_values: Vec<Vec<u8>>) -> Self {
        Self { digest_values }
    }

    /// Whether the group holds `value`
    pub fn contains(&self, value: &[u8]) -> bool {
        self.digest_values.iter().any(|v| v.as_slice() == value)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.digest_values.len()
    }

    /// Whether the group is empty
    pub fn is_empty(&self) -> bool {
        self.digest_values.is_empty()
    }
}

impl From<Vec<Vec<u8>>> for DigestValueGroup {
    fn from(digest_values: Vec<Vec<u8>>) -> Self {
        Self { digest_values }
    }
}

/// An RFC 3161 time-stamp token as seen by the verification engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampToken {
    /// DER encoding of the token (a CMS ContentInfo)
    #[serde(with = "crate::encoding::base64_bytes")]
    pub encoded: Vec<u8>,
    /// Message imprint, when the decoder extracted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_imprint: Option<Digest>,
    /// Generation time, when the decoder extracted it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<DateTime<Utc>>,
    /// Name of the issuing TSA, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsa_name: Option<String>,
}

impl TimestampToken {
    /// Create a token from its encoding only
    pub fn from_encoded(encoded: Vec<u8>) -> Self {
        Self {
            encoded,
            message_imprint: None,
            generation_time: None,
            tsa_name: None,
        }
    }

    /// Set the message imprint
    pub fn with_message_imprint(mut self, imprint: Digest) -> Self {
        self.message_imprint = Some(imprint);
        self
    }

    /// Set the generation time
    pub fn with_generation_time(mut self, time: DateTime<Utc>) -> Self {
        self.generation_time = Some(time);
        self
    }
}

/// Kind of a cryptographic information entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CryptographicInformationType {
    /// X.509 certificate
    Cert,
    /// Certificate revocation list
    Crl,
    /// OCSP response
    Ocsp,
    /// Anything else
    Other,
}

impl CryptographicInformationType {
    /// Whether entries of this kind carry revocation data
    pub fn is_revocation(&self) -> bool {
        matches!(self, Self::Crl | Self::Ocsp)
    }
}

/// Validation data stored alongside a time-stamp or the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptographicInformation {
    /// Kind of data
    #[serde(rename = "type")]
    pub kind: CryptographicInformationType,
    /// Encoded content
    #[serde(with = "crate::encoding::base64_bytes")]
    pub content: Vec<u8>,
}

impl CryptographicInformation {
    /// Create an entry
    pub fn new(kind: CryptographicInformationType, content: Vec<u8>) -> Self {
        Self { kind, content }
    }
}
