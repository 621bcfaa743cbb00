//! Time-stamp coverage
//!
//! Builds the digest each time-stamp token is expected to attest to and
//! relays the token validator's verdict, together with the references of
//! the time-stamp's own tree.

use crate::chain::RenewalLink;
use crate::policy::ValidationPolicy;
use crate::resolver::Resolution;
use chrono::{DateTime, Utc};
use ers_crypto::DigestEngine;
use ers_hashtree::{combine_group, SiblingOrder, VerifiedTree};
use ers_tsa::{SignatureStatus, TimestampTokenValidator};
use ers_types::{ArchiveTimeStamp, Digest, ReferenceType, ReferenceValidation};
use serde::{Deserialize, Serialize};

/// What was established about one time-stamp token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampOutcome {
    /// Evaluation ran to completion
    pub processed: bool,
    /// The token carries a message imprint
    pub message_imprint_found: bool,
    /// The imprint equals the expected digest and nothing below it failed
    pub message_imprint_intact: bool,
    /// Signature status reported by the token validator
    pub signature: SignatureStatus,
    /// Generation time reported by the token validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<DateTime<Utc>>,
    /// References covered by this time-stamp's own tree
    pub reference_validations: Vec<ReferenceValidation>,
}

/// How a tree was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSource {
    /// Stored in the archive time-stamp
    Stored,
    /// Built from a single digest because the tree was omitted
    Virtual,
    /// Omitted, and nothing to rebuild it from
    Missing,
}

/// Evaluates one archive time-stamp against its token
pub struct TimestampCoverageEvaluator<'a, V> {
    validator: &'a V,
    order: SiblingOrder,
    propagate_reference_failures: bool,
    engine: DigestEngine,
}

impl<'a, V: TimestampTokenValidator> TimestampCoverageEvaluator<'a, V> {
    /// Create an evaluator delegating token checks to `validator`
    pub fn new(validator: &'a V, policy: &ValidationPolicy) -> Self {
        Self {
            validator,
            order: policy.sibling_order,
            propagate_reference_failures: policy.propagate_reference_failures,
            engine: DigestEngine::new(),
        }
    }

    /// Digest the token must attest to
    ///
    /// The tree root, unless an in-chain renewal link is not part of
    /// level 0: then the link is one more digest step above the root.
    pub fn expected_imprint(
        &self,
        tree: Option<&VerifiedTree>,
        link: Option<&RenewalLink>,
        resolution: &Resolution,
    ) -> Option<Digest> {
        let root = &tree?.root;
        match link {
            Some(link) if !link.is_chain_link() && resolution.link_position.is_none() => Some(
                combine_group(
                    &self.engine,
                    root.algorithm,
                    self.order,
                    &[root.value.as_slice(), link.digest.value.as_slice()],
                ),
            ),
            _ => Some(root.clone()),
        }
    }

    /// Evaluate `ats` against `expected`
    pub fn evaluate(
        &self,
        ats: &ArchiveTimeStamp,
        expected: Option<&Digest>,
        link: Option<&RenewalLink>,
        source: TreeSource,
        resolution: Resolution,
    ) -> TimestampOutcome {
        let (message_imprint_found, token_intact, signature, generation_time) = match expected {
            Some(expected) => {
                let token = self.validator.validate(&ats.timestamp, expected);
                (
                    token.message_imprint_found,
                    token.message_imprint_intact,
                    token.signature,
                    token.generation_time.or(ats.timestamp.generation_time),
                )
            }
            None => {
                tracing::warn!("No expected message imprint can be built for the time-stamp");
                (
                    self.validator.message_imprint(&ats.timestamp).is_some(),
                    false,
                    SignatureStatus::NotChecked,
                    ats.timestamp.generation_time,
                )
            }
        };

        let mut intact = token_intact;
        let mut references = resolution.data_references;
        if source == TreeSource::Virtual {
            // Without a stored tree the imprint is the only check on the object
            for reference in &mut references {
                reference.intact &= token_intact;
            }
        }

        match (resolution.link_reference, link) {
            (Some(mut reference), _) => {
                if source == TreeSource::Virtual && reference.reference_type == ReferenceType::ArchiveTimestamp {
                    reference.intact = token_intact;
                }
                intact &= reference.intact;
                references.push(reference);
            }
            (None, Some(link)) if expected.is_some() => {
                references.push(ReferenceValidation::link(
                    link.kind,
                    link.digest.clone(),
                    true,
                    token_intact,
                ));
            }
            _ => {}
        }

        if self.propagate_reference_failures
            && references
                .iter()
                .any(|r| r.reference_type == ReferenceType::ArchiveObject && r.is_corrupted())
        {
            tracing::debug!("A covered data object is altered, imprint reported as not intact");
            intact = false;
        }

        TimestampOutcome {
            processed: true,
            message_imprint_found,
            message_imprint_intact: intact,
            signature,
            generation_time,
            reference_validations: references,
        }
    }
}
