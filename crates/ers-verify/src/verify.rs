//! Evidence record validation
//!
//! This module provides the main entry point for validating evidence records.
//! Chains are processed in sequence order and archive time-stamps in chain
//! order; each one goes through tree verification, reference resolution,
//! link checking and coverage evaluation. Only a structurally unusable
//! record is an error. Everything else is reported in the result.

use crate::chain::ChainLinkValidator;
use crate::coverage::{TimestampCoverageEvaluator, TimestampOutcome, TreeSource};
use crate::error::{Error, Result};
use crate::policy::ValidationPolicy;
use crate::resolver::{CandidateDigests, ManifestScope, ReferenceResolver, Resolution};
use crate::scope::{timestamp_id, timestamped_references};
use ers_crypto::DigestEngine;
use ers_hashtree::{HashTreeVerifier, VerifiedTree};
use ers_tsa::{ImprintValidator, TimestampTokenValidator};
use ers_types::{
    DataObject, Digest, DigestAlgorithm, DigestValueGroup, EvidenceRecord,
    EvidenceRecordTimestampType, ReferenceType, ReferenceValidation, TimestampedObjectCategory,
    TimestampedReference, ValidationMaterial,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress of one validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationState {
    /// Nothing processed yet
    NotStarted,
    /// Processing the chain with this index
    ChainStarted(usize),
    /// The chain with this index is done
    ChainComplete(usize),
    /// Record-level results are built
    Aggregated,
}

/// Validation of one archive time-stamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampValidation {
    /// Index of the chain in the sequence
    pub chain_index: usize,
    /// Index of the archive time-stamp in its chain
    pub index: usize,
    /// Identifier of the token
    pub id: String,
    /// Role of the archive time-stamp
    pub timestamp_type: EvidenceRecordTimestampType,
    /// Digest algorithm of its tree
    pub digest_algorithm: DigestAlgorithm,
    /// Digest the token was expected to attest to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_imprint: Option<Digest>,
    /// Token verdict and covered references
    pub outcome: TimestampOutcome,
    /// Objects covered by the token
    pub timestamped_references: Vec<TimestampedReference>,
}

impl TimestampValidation {
    /// References covered by this time-stamp's tree
    pub fn reference_validations(&self) -> &[ReferenceValidation] {
        &self.outcome.reference_validations
    }

    /// Whether the token's imprint is intact
    pub fn is_intact(&self) -> bool {
        self.outcome.message_imprint_intact
    }
}

/// Result of validating an evidence record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecordValidation {
    /// Data object references across all chains
    pub reference_validations: Vec<ReferenceValidation>,
    /// Archive time-stamps in sequence order
    pub timestamps: Vec<TimestampValidation>,
    state: ValidationState,
}

impl EvidenceRecordValidation {
    /// Every time-stamp is intact and every data object found and intact
    pub fn is_intact(&self) -> bool {
        !self.timestamps.is_empty()
            && self.timestamps.iter().all(|t| t.is_intact())
            && self.reference_validations.iter().all(|r| r.is_valid())
    }

    /// Data references for which no material was supplied
    pub fn orphan_references(&self) -> impl Iterator<Item = &ReferenceValidation> {
        self.reference_validations
            .iter()
            .filter(|r| r.reference_type == ReferenceType::OrphanReference)
    }

    /// Number of time-stamps whose imprint is intact
    pub fn intact_timestamp_count(&self) -> usize {
        self.timestamps.iter().filter(|t| t.is_intact()).count()
    }

    /// Time-stamps with the given role
    pub fn timestamps_of_type(
        &self,
        timestamp_type: EvidenceRecordTimestampType,
    ) -> impl Iterator<Item = &TimestampValidation> {
        self.timestamps
            .iter()
            .filter(move |t| t.timestamp_type == timestamp_type)
    }

    /// Distinct objects of `category` covered by any time-stamp
    pub fn timestamped_objects_count(&self, category: TimestampedObjectCategory) -> usize {
        let mut ids: Vec<&str> = self
            .timestamps
            .iter()
            .flat_map(|t| &t.timestamped_references)
            .filter(|r| r.category == category)
            .map(|r| r.id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// State the run ended in
    pub fn validated_state(&self) -> ValidationState {
        self.state
    }
}

/// A validator for evidence records
///
/// The token validator decides whether a time-stamp token attests to the
/// digest computed for it. The default compares message imprints only.
pub struct EvidenceRecordValidator<V = ImprintValidator> {
    policy: ValidationPolicy,
    token_validator: V,
    engine: DigestEngine,
}

impl EvidenceRecordValidator {
    /// Create a validator with the default policy
    pub fn new() -> Self {
        Self::with_policy(ValidationPolicy::default())
    }

    /// Create a validator with `policy`
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            token_validator: ImprintValidator::new(),
            engine: DigestEngine::new(),
        }
    }
}

impl Default for EvidenceRecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: TimestampTokenValidator> EvidenceRecordValidator<V> {
    /// Use `token_validator` for time-stamp tokens
    pub fn with_token_validator<W: TimestampTokenValidator>(
        self,
        token_validator: W,
    ) -> EvidenceRecordValidator<W> {
        EvidenceRecordValidator {
            policy: self.policy,
            token_validator,
            engine: self.engine,
        }
    }

    /// The policy in use
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validate `record` against the caller's `material`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ers_verify::EvidenceRecordValidator;
    /// use ers_types::{DataObject, EvidenceRecord, ValidationMaterial};
    ///
    /// # fn example(record: &EvidenceRecord) -> Result<(), Box<dyn std::error::Error>> {
    /// let material = ValidationMaterial::new()
    ///     .with_data_object(DataObject::from_bytes(b"hello".to_vec()).with_name("hello.txt"));
    /// let result = EvidenceRecordValidator::new().validate(record, &material)?;
    /// for reference in result.orphan_references() {
    ///     println!("not supplied: {:?}", reference.digest);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn validate(
        &self,
        record: &EvidenceRecord,
        material: &ValidationMaterial,
    ) -> Result<EvidenceRecordValidation> {
        self.check_structure(record)?;

        let links = ChainLinkValidator::new(&self.policy);
        let resolver = ReferenceResolver::new(&self.policy);
        let coverage = TimestampCoverageEvaluator::new(&self.token_validator, &self.policy);
        let mut cache = CandidateCache::new(&self.engine, &material.data_objects);

        let types = links.classify(record);
        let mut state = ValidationState::NotStarted;
        let mut timestamps = Vec::with_capacity(record.timestamp_count());
        let mut covered = Vec::with_capacity(record.timestamp_count());

        for (c, chain) in record.archive_time_stamp_sequence.iter().enumerate() {
            state = transition(state, ValidationState::ChainStarted(c));
            let chain_start = timestamps.len();
            let mut chain_broken = false;

            for (i, ats) in chain.archive_time_stamps.iter().enumerate() {
                let algorithm = ats.algorithm_in(chain);
                let link = links.link_for(record, c, i);
                let timestamp_type = types[c][i];
                let candidates = cache.get(algorithm);
                let verifier = HashTreeVerifier::new(algorithm, self.policy.sibling_order);

                let (tree, source) = self.tree_of(
                    &verifier,
                    ats.has_hash_tree().then_some(ats.hash_tree.as_slice()),
                    link.as_ref().map(|l| &l.digest).or_else(|| candidates.single()),
                    &candidates.provided(),
                )
                .map_err(|e| Error::hash_tree(c, i, e))?;

                let manifest = material
                    .manifest
                    .as_ref()
                    .filter(|_| i == 0)
                    .map(|manifest| ManifestScope {
                        manifest,
                        check_algorithms: c == 0,
                    });
                let resolution = match &tree {
                    Some(tree) => resolver.resolve(&tree.leaf_matches, candidates, link.as_ref(), manifest),
                    None => Resolution::unverifiable(),
                };
                if link.as_ref().is_some_and(|l| l.is_chain_link()) && resolution.link_is_broken() {
                    chain_broken = true;
                }

                let expected_imprint = coverage.expected_imprint(tree.as_ref(), link.as_ref(), &resolution);
                let data_candidates = resolution.data_candidates.clone();
                let outcome = coverage.evaluate(
                    ats,
                    expected_imprint.as_ref(),
                    link.as_ref(),
                    source,
                    resolution,
                );

                tracing::debug!(
                    "Archive time-stamp {}/{} ({}): imprint {}",
                    c,
                    i,
                    timestamp_type,
                    if outcome.message_imprint_intact { "intact" } else { "not intact" }
                );

                covered.push(CoveredObjects {
                    references: outcome
                        .reference_validations
                        .iter()
                        .filter(|r| r.reference_type.is_data_object())
                        .cloned()
                        .zip(data_candidates)
                        .collect(),
                    chain_broken: false,
                });
                timestamps.push(TimestampValidation {
                    chain_index: c,
                    index: i,
                    id: timestamp_id(&ats.timestamp),
                    timestamp_type,
                    digest_algorithm: algorithm,
                    expected_imprint,
                    outcome,
                    timestamped_references: Vec::new(),
                });
            }

            if chain_broken {
                tracing::warn!(
                    "Chain {} does not renew chain {}, its time-stamps are not reliable",
                    c,
                    c - 1
                );
                for timestamp in &mut timestamps[chain_start..] {
                    timestamp.outcome.message_imprint_intact = false;
                }
                for objects in &mut covered[chain_start..] {
                    objects.chain_broken = true;
                }
            }
            state = transition(state, ValidationState::ChainComplete(c));
        }

        let reference_validations = aggregate(&covered);
        let scopes = timestamped_references(record, &reference_validations);
        for timestamp in &mut timestamps {
            timestamp.timestamped_references = scopes[timestamp.chain_index][timestamp.index].clone();
        }
        state = transition(state, ValidationState::Aggregated);

        let result = EvidenceRecordValidation {
            reference_validations,
            timestamps,
            state,
        };
        tracing::info!(
            "Validated evidence record: {}/{} time-stamps intact, {} data objects, {} orphaned",
            result.intact_timestamp_count(),
            result.timestamps.len(),
            result.reference_validations.len(),
            result.orphan_references().count()
        );
        Ok(result)
    }

    /// Reject records that cannot be validated at all
    fn check_structure(&self, record: &EvidenceRecord) -> Result<()> {
        if record.archive_time_stamp_sequence.is_empty() {
            return Err(Error::Structure(
                "archive time-stamp sequence is empty".to_string(),
            ));
        }
        for (c, chain) in record.archive_time_stamp_sequence.iter().enumerate() {
            if chain.archive_time_stamps.is_empty() {
                return Err(Error::Structure(format!("chain {} is empty", c)));
            }
            for (i, ats) in chain.archive_time_stamps.iter().enumerate() {
                if !ats.has_hash_tree() {
                    continue;
                }
                HashTreeVerifier::new(ats.algorithm_in(chain), self.policy.sibling_order)
                    .check_structure(&ats.hash_tree)
                    .map_err(|e| Error::hash_tree(c, i, e))?;
            }
        }
        Ok(())
    }

    /// The stored tree, or a one-leaf tree built from `fallback`
    fn tree_of(
        &self,
        verifier: &HashTreeVerifier,
        stored: Option<&[DigestValueGroup]>,
        fallback: Option<&Digest>,
        provided: &[Vec<u8>],
    ) -> ers_hashtree::Result<(Option<VerifiedTree>, TreeSource)> {
        if let Some(groups) = stored {
            return Ok((Some(verifier.verify(groups, provided)?), TreeSource::Stored));
        }
        match fallback {
            Some(leaf) => {
                tracing::warn!("Hash tree omitted, using the single digest {}", leaf);
                let groups = [DigestValueGroup::new(vec![leaf.value.clone()])];
                Ok((Some(verifier.verify(&groups, provided)?), TreeSource::Virtual))
            }
            None => {
                tracing::warn!("Hash tree omitted and no digest to rebuild it from");
                Ok((None, TreeSource::Missing))
            }
        }
    }
}

/// Candidate digests per algorithm, computed on first use
struct CandidateCache<'a> {
    engine: &'a DigestEngine,
    objects: &'a [DataObject],
    by_algorithm: HashMap<DigestAlgorithm, CandidateDigests>,
}

impl<'a> CandidateCache<'a> {
    fn new(engine: &'a DigestEngine, objects: &'a [DataObject]) -> Self {
        Self {
            engine,
            objects,
            by_algorithm: HashMap::new(),
        }
    }

    fn get(&mut self, algorithm: DigestAlgorithm) -> &CandidateDigests {
        let (engine, objects) = (self.engine, self.objects);
        self.by_algorithm
            .entry(algorithm)
            .or_insert_with(|| CandidateDigests::compute(engine, algorithm, objects))
    }
}

fn transition(from: ValidationState, to: ValidationState) -> ValidationState {
    tracing::debug!("Evidence record validation: {:?} -> {:?}", from, to);
    to
}

/// Data references of one time-stamp, each with the supplied object it was tied to
struct CoveredObjects {
    references: Vec<(ReferenceValidation, Option<usize>)>,
    chain_broken: bool,
}

fn rank(reference: &ReferenceValidation) -> u8 {
    match (reference.found, reference.intact) {
        (true, true) => 2,
        (true, false) => 1,
        _ => 0,
    }
}

fn same_object(a: &(ReferenceValidation, Option<usize>), b: &(ReferenceValidation, Option<usize>)) -> bool {
    let (a, a_candidate) = a;
    let (b, b_candidate) = b;
    (a_candidate.is_some() && a_candidate == b_candidate)
        || (a.name.is_some() && a.name == b.name)
        || (a.digest.is_some() && a.digest == b.digest)
}

/// Record-level data references: one per covered object, best outcome wins
///
/// The initial tree of the first chain fixes the objects. Later trees
/// upgrade the entries they can tie to the same object by supplied object,
/// name or digest. An untied reference from a later tree is a new object
/// only when it was found, or when it is an orphan under the initial
/// algorithm in a chain that renews its predecessor.
fn aggregate(covered: &[CoveredObjects]) -> Vec<ReferenceValidation> {
    let Some(seed) = covered.first() else {
        return Vec::new();
    };
    let initial_algorithm = seed
        .references
        .iter()
        .find_map(|(r, _)| r.digest.as_ref().map(|d| d.algorithm));

    let mut result: Vec<(ReferenceValidation, Option<usize>)> = Vec::new();
    for (position, objects) in covered.iter().enumerate() {
        for entry in &objects.references {
            let (reference, candidate) = entry;
            match result.iter_mut().find(|existing| same_object(existing, entry)) {
                Some((existing, tied)) => {
                    if rank(reference) > rank(existing) {
                        *existing = reference.clone();
                        if candidate.is_some() {
                            *tied = *candidate;
                        }
                    }
                }
                None => {
                    let same_algorithm = reference
                        .digest
                        .as_ref()
                        .is_some_and(|d| Some(d.algorithm) == initial_algorithm);
                    if position == 0 || reference.found || (same_algorithm && !objects.chain_broken) {
                        result.push(entry.clone());
                    } else {
                        tracing::debug!(
                            "Reference {:?} cannot be tied to a covered object, left out of the record result",
                            reference.digest
                        );
                    }
                }
            }
        }
    }
    result.into_iter().map(|(reference, _)| reference).collect()
}

/// Validate `record` with the default policy and token validator
pub fn validate(
    record: &EvidenceRecord,
    material: &ValidationMaterial,
) -> Result<EvidenceRecordValidation> {
    EvidenceRecordValidator::new().validate(record, material)
}
