//! Reduced hash tree verification
//!
//! Recomputes the root of a stored tree and reconciles its level-0 values
//! with digests the caller can compute independently. A leaf that matches
//! nothing is reported, never treated as a failure of the whole tree.

use crate::error::{Error, Result};
use crate::tree::{combine_group, NodeKind, SiblingOrder, TreeNode};
use ers_crypto::DigestEngine;
use ers_types::{Digest, DigestAlgorithm, DigestValueGroup};

/// Match result for one level-0 value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafMatch {
    /// Position in level 0
    pub position: usize,
    /// The stored leaf digest
    pub expected: Digest,
    /// Indices of provided digests equal to the leaf
    pub candidates: Vec<usize>,
}

impl LeafMatch {
    /// Whether some provided digest equals the leaf
    pub fn is_resolved(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Result of verifying one tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedTree {
    /// Recomputed root
    pub root: Digest,
    /// Flat arena of all stored, carried and computed nodes
    pub nodes: Vec<TreeNode>,
    /// One entry per level-0 value, in stored order
    pub leaf_matches: Vec<LeafMatch>,
}

impl VerifiedTree {
    /// Nodes of one level, in position order
    pub fn level(&self, level: usize) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(move |n| n.level == level)
    }

    /// Number of levels
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.level + 1).max().unwrap_or(0)
    }

    /// Leaves that no provided digest matched
    pub fn unresolved(&self) -> impl Iterator<Item = &LeafMatch> {
        self.leaf_matches.iter().filter(|m| !m.is_resolved())
    }
}

/// Verifier for reduced hash trees of one algorithm
#[derive(Debug, Clone, Copy)]
pub struct HashTreeVerifier {
    algorithm: DigestAlgorithm,
    order: SiblingOrder,
    engine: DigestEngine,
}

impl HashTreeVerifier {
    /// Create a verifier
    pub fn new(algorithm: DigestAlgorithm, order: SiblingOrder) -> Self {
        Self {
            algorithm,
            order,
            engine: DigestEngine::new(),
        }
    }

    /// The digest algorithm of the tree
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Check the tree shape and value lengths without computing anything
    pub fn check_structure(&self, groups: &[DigestValueGroup]) -> Result<()> {
        if groups.is_empty() {
            return Err(Error::EmptyTree);
        }
        let expected = self.algorithm.digest_size();
        for (level, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(Error::EmptyGroup { level });
            }
            for (position, value) in group.digest_values.iter().enumerate() {
                if value.len() != expected {
                    return Err(Error::InvalidDigestLength {
                        level,
                        position,
                        expected,
                        actual: value.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Recompute the root only
    pub fn root(&self, groups: &[DigestValueGroup]) -> Result<Digest> {
        Ok(self.verify(groups, &[])?.root)
    }

    /// Recompute the root and reconcile level 0 with `provided`
    ///
    /// `provided` holds digests the caller computed for its candidate data
    /// objects. Only level 0 is reconciled; upper levels hold sibling nodes
    /// which cannot be recomputed without the objects they summarize.
    pub fn verify(&self, groups: &[DigestValueGroup], provided: &[Vec<u8>]) -> Result<VerifiedTree> {
        self.check_structure(groups)?;

        let mut nodes = Vec::new();
        let mut carried: Option<Digest> = None;

        for (level, group) in groups.iter().enumerate() {
            let mut values: Vec<&[u8]> = Vec::with_capacity(group.len() + 1);
            for (position, value) in group.digest_values.iter().enumerate() {
                nodes.push(TreeNode {
                    level,
                    position,
                    value: value.clone(),
                    kind: NodeKind::Stored,
                });
                values.push(value);
            }
            if let Some(previous) = &carried {
                nodes.push(TreeNode {
                    level,
                    position: group.len(),
                    value: previous.value.clone(),
                    kind: NodeKind::Carried,
                });
                values.push(&previous.value);
            }
            let digest = combine_group(&self.engine, self.algorithm, self.order, &values);
            nodes.push(TreeNode {
                level: level + 1,
                position: 0,
                value: digest.value.clone(),
                kind: NodeKind::Computed,
            });
            carried = Some(digest);
        }

        let root = carried.ok_or(Error::EmptyTree)?;
        let leaf_matches = self.match_leaves(&groups[0], provided);

        tracing::debug!(
            "Recomputed {} root {} over {} levels, {}/{} leaves matched",
            self.algorithm,
            root.to_hex(),
            groups.len(),
            leaf_matches.iter().filter(|m| m.is_resolved()).count(),
            leaf_matches.len()
        );

        Ok(VerifiedTree {
            root,
            nodes,
            leaf_matches,
        })
    }

    fn match_leaves(&self, leaves: &DigestValueGroup, provided: &[Vec<u8>]) -> Vec<LeafMatch> {
        leaves
            .digest_values
            .iter()
            .enumerate()
            .map(|(position, value)| LeafMatch {
                position,
                expected: Digest::new(self.algorithm, value.clone()),
                candidates: provided
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.as_slice() == value.as_slice())
                    .map(|(i, _)| i)
                    .collect(),
            })
            .collect()
    }
}
