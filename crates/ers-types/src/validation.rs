//! Output units of a validation run

use crate::digest::Digest;
use serde::{Deserialize, Serialize};

/// What a reference validation points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceType {
    /// A covered data object for which material was supplied
    ArchiveObject,
    /// A covered data object for which no material was supplied
    OrphanReference,
    /// The renewal link to the preceding archive time-stamp of the chain
    ArchiveTimestamp,
    /// The renewal link to the preceding chain
    ArchiveTimestampSequence,
}

impl ReferenceType {
    /// Whether the reference points at a data object rather than at the proof itself
    pub fn is_data_object(&self) -> bool {
        matches!(self, Self::ArchiveObject | Self::OrphanReference)
    }
}

/// Outcome of checking one expected reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceValidation {
    /// Kind of reference
    #[serde(rename = "type")]
    pub reference_type: ReferenceType,
    /// Identifier of the covered object, absent for orphans and unnamed input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expected digest taken from the tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
    /// Material for the reference was available
    pub found: bool,
    /// The material matched the expected digest
    pub intact: bool,
}

impl ReferenceValidation {
    /// A data object that was supplied
    pub fn archive_object(name: Option<String>, digest: Digest, intact: bool) -> Self {
        Self {
            reference_type: ReferenceType::ArchiveObject,
            name,
            digest: Some(digest),
            found: true,
            intact,
        }
    }

    /// A covered slot for which no material was supplied
    pub fn orphan(digest: Option<Digest>) -> Self {
        Self {
            reference_type: ReferenceType::OrphanReference,
            name: None,
            digest,
            found: false,
            intact: false,
        }
    }

    /// A renewal link reference
    pub fn link(reference_type: ReferenceType, digest: Digest, found: bool, intact: bool) -> Self {
        Self {
            reference_type,
            name: None,
            digest: Some(digest),
            found,
            intact,
        }
    }

    /// Found and intact
    pub fn is_valid(&self) -> bool {
        self.found && self.intact
    }

    /// Found but not intact
    pub fn is_corrupted(&self) -> bool {
        self.found && !self.intact
    }
}

/// Role of an archive time-stamp inside the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceRecordTimestampType {
    /// The first time-stamp of the whole sequence
    ArchiveTimestamp,
    /// Re-time-stamp of an unchanged tree
    TimestampRenewalArchiveTimestamp,
    /// New tree over the prior proof
    HashTreeRenewalArchiveTimestamp,
}

impl std::fmt::Display for EvidenceRecordTimestampType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArchiveTimestamp => write!(f, "ARCHIVE_TIMESTAMP"),
            Self::TimestampRenewalArchiveTimestamp => {
                write!(f, "TIMESTAMP_RENEWAL_ARCHIVE_TIMESTAMP")
            }
            Self::HashTreeRenewalArchiveTimestamp => {
                write!(f, "HASH_TREE_RENEWAL_ARCHIVE_TIMESTAMP")
            }
        }
    }
}

/// Kind of object covered by a time-stamp, for scope reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimestampedObjectCategory {
    /// A detached data object
    SignedData,
    /// The evidence record itself
    EvidenceRecord,
    /// An earlier time-stamp
    Timestamp,
    /// A certificate
    Certificate,
    /// A CRL or OCSP response
    Revocation,
}

/// One object covered by a time-stamp
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampedReference {
    /// Kind of covered object
    pub category: TimestampedObjectCategory,
    /// Identifier of the covered object
    pub id: String,
}

impl TimestampedReference {
    /// Create a reference
    pub fn new(category: TimestampedObjectCategory, id: impl Into<String>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }
}
