//! Reference resolution
//!
//! Matches the level-0 leaves of one tree against the caller's data objects
//! and turns every leaf into a [`ReferenceValidation`]. Matching is by digest
//! value; names only label the result. A leaf the material does not explain
//! becomes an orphan reference, which is a normal outcome.

use crate::chain::RenewalLink;
use crate::policy::{UnmatchedObjectPolicy, ValidationPolicy};
use ers_crypto::DigestEngine;
use ers_hashtree::LeafMatch;
use ers_types::{
    DataObject, DataObjectContent, Digest, DigestAlgorithm, Manifest, ReferenceType,
    ReferenceValidation,
};

/// Digest of one data object in one algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDigest {
    /// Position of the object in the caller's material
    pub index: usize,
    /// Object name
    pub name: Option<String>,
    /// `None` when the object cannot be compared in this algorithm
    pub digest: Option<Digest>,
}

/// The caller's data objects, digested for one algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDigests {
    algorithm: DigestAlgorithm,
    entries: Vec<CandidateDigest>,
}

impl CandidateDigests {
    /// Digest `objects` with `algorithm`
    ///
    /// Raw objects are digested; digest-only objects contribute the digest
    /// they carry for `algorithm`, if any.
    pub fn compute(engine: &DigestEngine, algorithm: DigestAlgorithm, objects: &[DataObject]) -> Self {
        let entries = objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                let digest = match &object.content {
                    DataObjectContent::Bytes(bytes) => Some(engine.digest(algorithm, bytes)),
                    DataObjectContent::Digests(_) => {
                        object.precomputed_digest(algorithm).and_then(|d| {
                            if d.has_valid_length() {
                                Some(d.clone())
                            } else {
                                tracing::warn!(
                                    "Ignoring {} digest of data object {} with {} bytes",
                                    algorithm,
                                    index,
                                    d.value.len()
                                );
                                None
                            }
                        })
                    }
                };
                CandidateDigest {
                    index,
                    name: object.name.clone(),
                    digest,
                }
            })
            .collect();
        Self { algorithm, entries }
    }

    /// The algorithm of the digests
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// All candidates in material order
    pub fn entries(&self) -> &[CandidateDigest] {
        &self.entries
    }

    /// Digest values aligned with the material, empty where not comparable
    pub fn provided(&self) -> Vec<Vec<u8>> {
        self.entries
            .iter()
            .map(|c| c.digest.as_ref().map(|d| d.value.clone()).unwrap_or_default())
            .collect()
    }

    /// The only comparable candidate, if there is exactly one
    pub fn single(&self) -> Option<&Digest> {
        let mut comparable = self.entries.iter().filter_map(|c| c.digest.as_ref());
        match (comparable.next(), comparable.next()) {
            (Some(digest), None) => Some(digest),
            _ => None,
        }
    }

    /// Whether a candidate named `name` was supplied
    pub fn has_name(&self, name: &str) -> bool {
        self.entries.iter().any(|c| c.name.as_deref() == Some(name))
    }

    fn get(&self, index: usize) -> Option<&CandidateDigest> {
        self.entries.get(index)
    }
}

/// How the manifest takes part in one resolution
#[derive(Debug, Clone, Copy)]
pub struct ManifestScope<'a> {
    /// The caller's manifest
    pub manifest: &'a Manifest,
    /// Compare entry algorithms with reference algorithms
    pub check_algorithms: bool,
}

/// Outcome of resolving one tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Data object references, leaf order first, then manifest additions
    pub data_references: Vec<ReferenceValidation>,
    /// Renewal link reference, when the tree settles it
    pub link_reference: Option<ReferenceValidation>,
    /// Level-0 position holding the renewal link
    pub link_position: Option<usize>,
    /// Index of the supplied object behind each data reference, parallel
    /// to `data_references`
    pub data_candidates: Vec<Option<usize>>,
}

impl Resolution {
    /// Resolution of a time-stamp whose covered data cannot be determined
    pub fn unverifiable() -> Self {
        Self {
            data_references: vec![ReferenceValidation::orphan(None)],
            link_reference: None,
            link_position: None,
            data_candidates: vec![None],
        }
    }

    /// Whether the tree failed to embed its chain-renewal link
    pub fn link_is_broken(&self) -> bool {
        self.link_reference.as_ref().is_some_and(|r| !r.intact)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Unresolved,
    Matched { candidate: usize, name: Option<String> },
    Named { name: String, found: bool },
    Substituted { candidate: usize },
    Link,
    BrokenLink,
}

/// Classifies the level-0 leaves of a tree
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver {
    unmatched_objects: UnmatchedObjectPolicy,
}

impl ReferenceResolver {
    /// Create a resolver following `policy`
    pub fn new(policy: &ValidationPolicy) -> Self {
        Self {
            unmatched_objects: policy.unmatched_objects,
        }
    }

    /// Resolve `leaves` against `candidates`
    ///
    /// Leaves are settled in this order: digest matches, manifest names,
    /// the renewal link, a broken chain-renewal link, a substituted object.
    /// Whatever remains is orphaned.
    pub fn resolve(
        &self,
        leaves: &[LeafMatch],
        candidates: &CandidateDigests,
        link: Option<&RenewalLink>,
        manifest: Option<ManifestScope<'_>>,
    ) -> Resolution {
        let mut slots: Vec<Slot> = leaves.iter().map(|leaf| self.match_digest(leaf, candidates)).collect();

        if let Some(scope) = manifest {
            apply_manifest_names(&mut slots, leaves, candidates, scope.manifest);
        }

        let mut link_reference = None;
        let mut link_position = None;
        if let Some(link) = link {
            link_position = leaves.iter().position(|leaf| {
                slots[leaf.position] == Slot::Unresolved && leaf.expected.value == link.digest.value
            });
            if let Some(position) = link_position {
                slots[position] = Slot::Link;
                link_reference = Some(ReferenceValidation::link(link.kind, link.digest.clone(), true, true));
            } else if link.is_chain_link() {
                link_reference = Some(broken_chain_link(&mut slots, leaves, link));
            }
        }

        if self.unmatched_objects == UnmatchedObjectPolicy::SubstituteSingle {
            substitute_single(&mut slots, candidates);
        }

        let mut resolved: Vec<(ReferenceValidation, Option<usize>)> = leaves
            .iter()
            .zip(&slots)
            .filter_map(|(leaf, slot)| data_reference(leaf, slot, candidates))
            .collect();

        if let Some(scope) = manifest {
            add_missing_entries(&mut resolved, candidates, scope);
        }
        let (data_references, data_candidates): (Vec<_>, Vec<_>) = resolved.into_iter().unzip();

        tracing::debug!(
            "Resolved {} leaves: {} found, {} intact, link {}",
            leaves.len(),
            data_references.iter().filter(|r| r.found).count(),
            data_references.iter().filter(|r| r.is_valid()).count(),
            match (&link_reference, link) {
                (Some(r), _) if r.intact => "present",
                (Some(_), _) => "broken",
                (None, Some(_)) => "outside level 0",
                (None, None) => "none",
            }
        );

        Resolution {
            data_references,
            link_reference,
            link_position,
            data_candidates,
        }
    }

    /// Best candidate for a leaf: named before unnamed, then by name, then by position
    fn match_digest(&self, leaf: &LeafMatch, candidates: &CandidateDigests) -> Slot {
        leaf.candidates
            .iter()
            .filter_map(|&i| candidates.get(i))
            .min_by(|a, b| {
                (a.name.is_none(), &a.name, a.index).cmp(&(b.name.is_none(), &b.name, b.index))
            })
            .map(|c| Slot::Matched {
                candidate: c.index,
                name: c.name.clone(),
            })
            .unwrap_or(Slot::Unresolved)
    }
}

fn apply_manifest_names(
    slots: &mut [Slot],
    leaves: &[LeafMatch],
    candidates: &CandidateDigests,
    manifest: &Manifest,
) {
    for (leaf, slot) in leaves.iter().zip(slots.iter_mut()) {
        let Some(entry) = manifest.entry_for_digest(&leaf.expected.value) else {
            continue;
        };
        let named = match slot {
            Slot::Matched { name, .. } => {
                if name.is_none() {
                    *name = Some(entry.name.clone());
                }
                continue;
            }
            Slot::Unresolved => Slot::Named {
                name: entry.name.clone(),
                found: candidates.has_name(&entry.name),
            },
            _ => continue,
        };
        *slot = named;
    }
}

fn broken_chain_link(slots: &mut [Slot], leaves: &[LeafMatch], link: &RenewalLink) -> ReferenceValidation {
    let unresolved: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| **slot == Slot::Unresolved)
        .map(|(position, _)| position)
        .collect();

    tracing::warn!(
        "Chain-renewal link {} is not covered by the hash tree",
        link.digest
    );

    if let [position] = unresolved[..] {
        slots[position] = Slot::BrokenLink;
        ReferenceValidation::link(link.kind, leaves[position].expected.clone(), true, false)
    } else {
        ReferenceValidation::link(link.kind, link.digest.clone(), true, false)
    }
}

fn substitute_single(slots: &mut [Slot], candidates: &CandidateDigests) {
    let mut unresolved = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| **slot == Slot::Unresolved)
        .map(|(position, _)| position);
    let (Some(position), None) = (unresolved.next(), unresolved.next()) else {
        return;
    };

    let used: Vec<usize> = slots
        .iter()
        .filter_map(|slot| match slot {
            Slot::Matched { candidate, .. } => Some(*candidate),
            _ => None,
        })
        .collect();
    let mut unused = candidates
        .entries()
        .iter()
        .filter(|c| c.name.is_some() && c.digest.is_some() && !used.contains(&c.index));

    if let (Some(candidate), None) = (unused.next(), unused.next()) {
        tracing::debug!(
            "Reporting data object {:?} as the altered object of leaf {}",
            candidate.name,
            position
        );
        slots[position] = Slot::Substituted {
            candidate: candidate.index,
        };
    }
}

/// Data reference of one leaf and the supplied object it was tied to
fn data_reference(
    leaf: &LeafMatch,
    slot: &Slot,
    candidates: &CandidateDigests,
) -> Option<(ReferenceValidation, Option<usize>)> {
    let expected = leaf.expected.clone();
    match slot {
        Slot::Matched { candidate, name } => Some((
            ReferenceValidation::archive_object(name.clone(), expected, true),
            Some(*candidate),
        )),
        Slot::Named { name, found } => Some((
            ReferenceValidation {
                reference_type: ReferenceType::ArchiveObject,
                name: Some(name.clone()),
                digest: Some(expected),
                found: *found,
                intact: false,
            },
            None,
        )),
        Slot::Substituted { candidate } => Some((
            ReferenceValidation::archive_object(
                candidates.get(*candidate).and_then(|c| c.name.clone()),
                expected,
                false,
            ),
            Some(*candidate),
        )),
        Slot::Unresolved => Some((ReferenceValidation::orphan(Some(expected)), None)),
        Slot::Link | Slot::BrokenLink => None,
    }
}

fn add_missing_entries(
    references: &mut Vec<(ReferenceValidation, Option<usize>)>,
    candidates: &CandidateDigests,
    scope: ManifestScope<'_>,
) {
    let missing: Vec<ReferenceValidation> = scope
        .manifest
        .entries
        .iter()
        .filter(|entry| {
            !references
                .iter()
                .any(|(r, _)| r.name.as_deref() == Some(entry.name.as_str()))
        })
        .map(|entry| {
            tracing::warn!("Manifest entry {} is not covered by the hash tree", entry.name);
            ReferenceValidation {
                reference_type: ReferenceType::ArchiveObject,
                name: Some(entry.name.clone()),
                digest: entry.digest.clone(),
                found: candidates.has_name(&entry.name),
                intact: false,
            }
        })
        .collect();

    let failed = references.iter().filter(|(r, _)| !r.intact).count();
    if !missing.is_empty() && missing.len() >= failed {
        references.retain(|(r, _)| r.intact);
    }
    references.extend(missing.into_iter().map(|r| (r, None)));

    if !scope.check_algorithms {
        return;
    }
    for entry in &scope.manifest.entries {
        let Some(entry_digest) = &entry.digest else {
            continue;
        };
        for (reference, _) in references
            .iter_mut()
            .filter(|(r, _)| r.name.as_deref() == Some(entry.name.as_str()))
        {
            let mismatch = reference
                .digest
                .as_ref()
                .is_some_and(|d| d.algorithm != entry_digest.algorithm);
            if mismatch && reference.intact {
                tracing::warn!(
                    "Manifest entry {} uses {}, the hash tree does not",
                    entry.name,
                    entry_digest.algorithm
                );
                reference.intact = false;
            }
        }
    }
}
