//! Caller-supplied validation material
//!
//! Detached data objects (raw bytes or pre-computed digests) and an optional
//! manifest naming the objects covered by the initial time-stamps.

use crate::digest::{Digest, DigestAlgorithm};
use serde::{Deserialize, Serialize};

/// A candidate data object supplied for validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataObject {
    /// Identifier of the object (file name, URI, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Content or digests of the object
    pub content: DataObjectContent,
}

/// How a data object is supplied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataObjectContent {
    /// Raw bytes, digested on demand with whatever algorithm a tree needs
    Bytes(#[serde(with = "crate::encoding::base64_bytes")] Vec<u8>),
    /// Pre-computed digests, at most one per algorithm is used
    Digests(Vec<Digest>),
}

impl DataObject {
    /// A data object given by its content
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: None,
            content: DataObjectContent::Bytes(bytes.into()),
        }
    }

    /// A data object given by one pre-computed digest
    pub fn from_digest(digest: Digest) -> Self {
        Self {
            name: None,
            content: DataObjectContent::Digests(vec![digest]),
        }
    }

    /// A data object given by several pre-computed digests
    pub fn from_digests(digests: Vec<Digest>) -> Self {
        Self {
            name: None,
            content: DataObjectContent::Digests(digests),
        }
    }

    /// Set the object name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Pre-computed digest for `algorithm`, if supplied that way
    pub fn precomputed_digest(&self, algorithm: DigestAlgorithm) -> Option<&Digest> {
        match &self.content {
            DataObjectContent::Bytes(_) => None,
            DataObjectContent::Digests(digests) => {
                digests.iter().find(|d| d.algorithm == algorithm)
            }
        }
    }

    /// Raw content, if supplied that way
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.content {
            DataObjectContent::Bytes(bytes) => Some(bytes),
            DataObjectContent::Digests(_) => None,
        }
    }
}

/// Manifest listing the files an initial time-stamp is meant to cover
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Entries in manifest order
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Create a manifest
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Entry whose digest equals `value`
    pub fn entry_for_digest(&self, value: &[u8]) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|e| e.digest.as_ref().is_some_and(|d| d.value == value))
    }
}

/// One file named by a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// File name
    pub name: String,
    /// Declared digest of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<Digest>,
}

impl ManifestEntry {
    /// Create an entry
    pub fn new(name: impl Into<String>, digest: Option<Digest>) -> Self {
        Self {
            name: name.into(),
            digest,
        }
    }
}

/// Everything a caller supplies next to the record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMaterial {
    /// Detached data objects
    #[serde(default)]
    pub data_objects: Vec<DataObject>,
    /// Optional manifest for the initial time-stamps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
}

impl ValidationMaterial {
    /// Empty material: every data reference will be orphaned
    pub fn new() -> Self {
        Self::default()
    }

    /// Material made of the given data objects
    pub fn from_data_objects(data_objects: Vec<DataObject>) -> Self {
        Self {
            data_objects,
            manifest: None,
        }
    }

    /// Add a data object
    pub fn with_data_object(mut self, data_object: DataObject) -> Self {
        self.data_objects.push(data_object);
        self
    }

    /// Attach a manifest
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = Some(manifest);
        self
    }
}
