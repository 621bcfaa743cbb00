//! Reduced hash tree hashing utilities
//!
//! A reduced hash tree is a list of digest groups. The digest of each group
//! is carried into the next group, and the digest of the last group is the
//! root (RFC 4998 section 4.3):
//! - a group holding a single value passes that value through unchanged
//! - otherwise the values are ordered, concatenated and digested

use ers_crypto::DigestEngine;
use ers_types::{Digest, DigestAlgorithm};
use serde::{Deserialize, Serialize};

/// Order in which sibling values are concatenated before digesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiblingOrder {
    /// Sort by unsigned binary value, ascending (RFC 4998 and RFC 6283)
    #[default]
    BinaryAscending,
    /// Concatenate in stored order
    AsStored,
}

/// Where a node of the arena comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A value stored in the tree
    Stored,
    /// The digest of the previous group, carried into this one
    Carried,
    /// The digest of a whole group
    Computed,
}

/// One node of the flat arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Group index, 0 for the leaves
    pub level: usize,
    /// Position inside the level
    pub position: usize,
    /// Digest bytes
    pub value: Vec<u8>,
    /// Origin of the node
    pub kind: NodeKind,
}

/// Combine sibling values into their parent digest
///
/// The input slice is never reordered; sorting happens on a copy of the
/// references.
pub fn combine_group<T: AsRef<[u8]>>(
    engine: &DigestEngine,
    algorithm: DigestAlgorithm,
    order: SiblingOrder,
    values: &[T],
) -> Digest {
    if let [single] = values {
        return Digest::new(algorithm, single.as_ref().to_vec());
    }
    let mut ordered: Vec<&[u8]> = values.iter().map(|v| v.as_ref()).collect();
    if order == SiblingOrder::BinaryAscending {
        ordered.sort_unstable();
    }
    engine.digest_concat(algorithm, &ordered)
}
