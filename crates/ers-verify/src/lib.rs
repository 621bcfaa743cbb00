//! Evidence Record verification engine
//!
//! Validates RFC 4998 / RFC 6283 evidence records against caller-supplied
//! data objects. For every archive time-stamp the reduced hash tree is
//! recomputed, its leaves are matched against the material, the renewal
//! links to earlier proofs are checked and the expected message imprint is
//! handed to a [`TimestampTokenValidator`](ers_tsa::TimestampTokenValidator).
//!
//! The result lists every covered data object as found or orphaned and
//! intact or altered, and every time-stamp with its role and outcome.

pub mod chain;
pub mod coverage;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod scope;
pub mod verify;

pub use chain::{ChainLinkValidator, RenewalLink};
pub use coverage::{TimestampCoverageEvaluator, TimestampOutcome, TreeSource};
pub use error::{Error, Result};
pub use policy::{RenewalDigestInput, UnmatchedObjectPolicy, ValidationPolicy};
pub use resolver::{CandidateDigest, CandidateDigests, ManifestScope, ReferenceResolver, Resolution};
pub use verify::{
    validate, EvidenceRecordValidation, EvidenceRecordValidator, TimestampValidation,
    ValidationState,
};
