//! Digest primitives for Evidence Record verification
//!
//! This crate provides the digest engine used to hash data objects, archive
//! time-stamps and hash-tree node groups, using aws-lc-rs as the backend.

pub mod error;
pub mod hash;

pub use error::{Error, Result};
pub use hash::{sha256, DigestCalculator, DigestEngine};
