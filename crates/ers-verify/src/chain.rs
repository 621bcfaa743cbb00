//! Renewal links and archive time-stamp classification
//!
//! Every archive time-stamp after the first is linked to the proof it
//! renews:
//! - inside a chain, to `H(previous archive time-stamp)`
//! - at the start of a later chain, to `H(last archive time-stamp of the previous chain)`
//!
//! The link digest is computed here; where it must appear in a tree and what
//! happens when it does not is decided by the resolver and the coverage
//! evaluator.

use crate::policy::{RenewalDigestInput, ValidationPolicy};
use ers_crypto::DigestEngine;
use ers_types::{Digest, EvidenceRecord, EvidenceRecordTimestampType, ReferenceType};

/// Digest an archive time-stamp must cover to renew its predecessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewalLink {
    /// `ArchiveTimestamp` inside a chain, `ArchiveTimestampSequence` across chains
    pub kind: ReferenceType,
    /// Digest of the predecessor
    pub digest: Digest,
}

impl RenewalLink {
    /// Whether the link crosses a chain boundary
    pub fn is_chain_link(&self) -> bool {
        self.kind == ReferenceType::ArchiveTimestampSequence
    }
}

/// Computes renewal links and the role of each archive time-stamp
#[derive(Debug, Clone, Copy)]
pub struct ChainLinkValidator {
    engine: DigestEngine,
    renewal_input: RenewalDigestInput,
}

impl ChainLinkValidator {
    /// Create a validator following `policy`
    pub fn new(policy: &ValidationPolicy) -> Self {
        Self {
            engine: DigestEngine::new(),
            renewal_input: policy.renewal_digest_input,
        }
    }

    /// Renewal link of archive time-stamp `index` of chain `chain_index`
    ///
    /// `None` for the first archive time-stamp of the sequence and for
    /// positions outside the record.
    pub fn link_for(
        &self,
        record: &EvidenceRecord,
        chain_index: usize,
        index: usize,
    ) -> Option<RenewalLink> {
        let chain = record.archive_time_stamp_sequence.get(chain_index)?;
        let ats = chain.archive_time_stamps.get(index)?;

        if index > 0 {
            let predecessor = &chain.archive_time_stamps[index - 1];
            let algorithm = ats.algorithm_in(chain);
            return Some(RenewalLink {
                kind: ReferenceType::ArchiveTimestamp,
                digest: self
                    .engine
                    .digest(algorithm, self.renewal_input.bytes_of(predecessor)),
            });
        }

        let previous = record
            .archive_time_stamp_sequence
            .get(chain_index.checked_sub(1)?)?
            .last()?;
        Some(RenewalLink {
            kind: ReferenceType::ArchiveTimestampSequence,
            digest: self
                .engine
                .digest(chain.digest_algorithm, self.renewal_input.bytes_of(previous)),
        })
    }

    /// Classify every archive time-stamp, indexed `[chain][index]`
    pub fn classify(&self, record: &EvidenceRecord) -> Vec<Vec<EvidenceRecordTimestampType>> {
        record
            .archive_time_stamp_sequence
            .iter()
            .enumerate()
            .map(|(c, chain)| {
                (0..chain.archive_time_stamps.len())
                    .filter_map(|i| self.classify_one(record, c, i))
                    .collect()
            })
            .collect()
    }

    /// Classify archive time-stamp `index` of chain `chain_index`, if it exists
    ///
    /// Inside a chain a time-stamp is a time-stamp renewal when it keeps the
    /// algorithm of its predecessor and covers the same data leaves, or none
    /// besides its link. Anything else rebuilt the tree.
    pub fn classify_one(
        &self,
        record: &EvidenceRecord,
        chain_index: usize,
        index: usize,
    ) -> Option<EvidenceRecordTimestampType> {
        let chain = record.archive_time_stamp_sequence.get(chain_index)?;
        let current = chain.archive_time_stamps.get(index)?;
        if index == 0 {
            return Some(if chain_index == 0 {
                EvidenceRecordTimestampType::ArchiveTimestamp
            } else {
                EvidenceRecordTimestampType::HashTreeRenewalArchiveTimestamp
            });
        }

        let predecessor = &chain.archive_time_stamps[index - 1];
        if current.algorithm_in(chain) != predecessor.algorithm_in(chain) {
            return Some(EvidenceRecordTimestampType::HashTreeRenewalArchiveTimestamp);
        }

        let covered = self.data_leaves(record, chain_index, index - 1);
        let leaves = self.data_leaves(record, chain_index, index);
        let unchanged = leaves.is_empty()
            || (leaves.iter().all(|leaf| covered.contains(leaf))
                && covered.iter().all(|leaf| leaves.contains(leaf)));

        Some(if unchanged {
            EvidenceRecordTimestampType::TimestampRenewalArchiveTimestamp
        } else {
            EvidenceRecordTimestampType::HashTreeRenewalArchiveTimestamp
        })
    }

    /// Level-0 values of a tree other than its own renewal link
    fn data_leaves(&self, record: &EvidenceRecord, chain_index: usize, index: usize) -> Vec<Vec<u8>> {
        let ats = &record.archive_time_stamp_sequence[chain_index].archive_time_stamps[index];
        let link = self.link_for(record, chain_index, index);
        ats.level_zero()
            .map(|group| {
                group
                    .digest_values
                    .iter()
                    .filter(|value| link.as_ref().map_or(true, |l| l.digest.value != **value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
