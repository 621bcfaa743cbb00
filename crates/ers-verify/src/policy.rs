//! Validation policy
//!
//! Settles the points on which evidence record producers differ: how sibling
//! digests are ordered, which bytes identify a renewed archive time-stamp,
//! and how unmatched data objects are reported.

use ers_hashtree::SiblingOrder;
use ers_types::ArchiveTimeStamp;
use serde::{Deserialize, Serialize};

/// Bytes hashed to obtain the renewal link of a predecessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenewalDigestInput {
    /// The full encoded ArchiveTimeStamp (RFC 4998 section 5.2)
    #[default]
    ArchiveTimeStamp,
    /// The encoded time-stamp token only
    TimeStampToken,
}

impl RenewalDigestInput {
    /// The bytes of `ats` that its successor links to
    pub fn bytes_of<'a>(&self, ats: &'a ArchiveTimeStamp) -> &'a [u8] {
        match self {
            RenewalDigestInput::ArchiveTimeStamp => ats.encoded_or_token(),
            RenewalDigestInput::TimeStampToken => &ats.timestamp.encoded,
        }
    }
}

/// Reporting of a supplied object that matches no leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnmatchedObjectPolicy {
    /// With exactly one unresolved leaf and exactly one unused named object,
    /// report the object as found but not intact
    #[default]
    SubstituteSingle,
    /// Leave the leaf orphaned and the object unused
    Orphan,
}

/// Policy for validating evidence records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationPolicy {
    /// Ordering of sibling digests before they are combined
    pub sibling_order: SiblingOrder,
    /// Input of the renewal link digests
    pub renewal_digest_input: RenewalDigestInput,
    /// Handling of supplied objects that match no leaf
    pub unmatched_objects: UnmatchedObjectPolicy,
    /// Mark a time-stamp's imprint as not intact when one of its data
    /// references is found but not intact
    pub propagate_reference_failures: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            sibling_order: SiblingOrder::default(),
            renewal_digest_input: RenewalDigestInput::default(),
            unmatched_objects: UnmatchedObjectPolicy::default(),
            propagate_reference_failures: true,
        }
    }
}

impl ValidationPolicy {
    /// Use `order` when combining sibling digests
    pub fn with_sibling_order(mut self, order: SiblingOrder) -> Self {
        self.sibling_order = order;
        self
    }

    /// Use `input` when computing renewal links
    pub fn with_renewal_digest_input(mut self, input: RenewalDigestInput) -> Self {
        self.renewal_digest_input = input;
        self
    }

    /// Never substitute an unmatched object for an unresolved leaf
    pub fn orphan_unmatched_objects(mut self) -> Self {
        self.unmatched_objects = UnmatchedObjectPolicy::Orphan;
        self
    }

    /// Keep data reference failures off the time-stamp outcome
    pub fn skip_reference_propagation(mut self) -> Self {
        self.propagate_reference_failures = false;
        self
    }
}
