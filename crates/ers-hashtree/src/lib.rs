//! Reduced hash tree verification for Evidence Records
//!
//! This crate recomputes the root of an RFC 4998 reduced hash tree and
//! reports which level-0 leaves can be reconciled with caller-supplied
//! digests. Nodes are kept in a flat arena indexed by `(level, position)`.

pub mod error;
pub mod tree;
pub mod verify;

pub use error::{Error, Result};
pub use tree::{combine_group, NodeKind, SiblingOrder, TreeNode};
pub use verify::{HashTreeVerifier, LeafMatch, VerifiedTree};
