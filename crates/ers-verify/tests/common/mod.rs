//! Fixture builders for evidence record validation tests
//!
//! Records are built with the real digest engine and hash tree verifier, so
//! every root, link and token imprint is consistent unless a test breaks it
//! on purpose. Tokens are opaque byte strings carrying their imprint in the
//! model.

#![allow(dead_code)]

use ers_crypto::DigestEngine;
use ers_hashtree::{combine_group, HashTreeVerifier, SiblingOrder};
use ers_types::{
    ArchiveTimeStamp, ArchiveTimeStampChain, DataObject, Digest, DigestAlgorithm,
    DigestValueGroup, EvidenceRecord, TimestampToken,
};

pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Digest {
    DigestEngine::new().digest(algorithm, data)
}

pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha256, data).value
}

pub fn root(algorithm: DigestAlgorithm, groups: &[DigestValueGroup]) -> Digest {
    HashTreeVerifier::new(algorithm, SiblingOrder::BinaryAscending)
        .root(groups)
        .unwrap()
}

/// Named data objects "1", "2", ... with content "document <n>"
pub fn documents(count: usize) -> Vec<DataObject> {
    (1..=count)
        .map(|n| DataObject::from_bytes(content(n)).with_name(n.to_string()))
        .collect()
}

pub fn content(n: usize) -> Vec<u8> {
    format!("document {}", n).into_bytes()
}

/// Builds an evidence record chain by chain
pub struct RecordBuilder {
    chains: Vec<ArchiveTimeStampChain>,
    encode_archive_time_stamps: bool,
    token_only_links: bool,
    serial: u32,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            chains: Vec::new(),
            encode_archive_time_stamps: false,
            token_only_links: false,
            serial: 0,
        }
    }

    /// Give every archive time-stamp an encoding distinct from its token,
    /// and link renewals to the token encoding only
    pub fn with_token_links(mut self) -> Self {
        self.encode_archive_time_stamps = true;
        self.token_only_links = true;
        self
    }

    /// Start a chain whose first time-stamp covers `leaves` (one level)
    pub fn initial(self, algorithm: DigestAlgorithm, leaves: Vec<Vec<u8>>) -> Self {
        self.initial_tree(algorithm, vec![DigestValueGroup::new(leaves)])
    }

    /// Start a chain whose first time-stamp has the given tree
    pub fn initial_tree(mut self, algorithm: DigestAlgorithm, tree: Vec<DigestValueGroup>) -> Self {
        let ats = self.stamp(algorithm, tree, None);
        self.chains.push(ArchiveTimeStampChain::new(algorithm, vec![ats]));
        self
    }

    /// Start a chain whose first time-stamp has no tree and attests to `imprint`
    pub fn initial_without_tree(mut self, algorithm: DigestAlgorithm, imprint: Digest) -> Self {
        let ats = self.stamp_imprint(algorithm, vec![], imprint);
        self.chains.push(ArchiveTimeStampChain::new(algorithm, vec![ats]));
        self
    }

    /// Re-time-stamp the last time-stamp: level 0 holds the link only
    pub fn timestamp_renewal(mut self) -> Self {
        let algorithm = self.current_algorithm();
        let link = self.in_chain_link(algorithm);
        let ats = self.stamp(algorithm, vec![DigestValueGroup::new(vec![link])], None);
        self.push(ats);
        self
    }

    /// Re-time-stamp the last time-stamp without storing a tree
    pub fn timestamp_renewal_without_tree(mut self) -> Self {
        let algorithm = self.current_algorithm();
        let link = self.in_chain_link(algorithm);
        let ats = self.stamp_imprint(algorithm, vec![], Digest::new(algorithm, link));
        self.push(ats);
        self
    }

    /// New tree in the same chain: the link plus `leaves` at level 0
    pub fn hash_tree_renewal(mut self, leaves: Vec<Vec<u8>>) -> Self {
        let algorithm = self.current_algorithm();
        let mut level = vec![self.in_chain_link(algorithm)];
        level.extend(leaves);
        let ats = self.stamp(algorithm, vec![DigestValueGroup::new(level)], None);
        self.push(ats);
        self
    }

    /// Renewal whose tree covers `leaves` only; the link is one more step above the root
    pub fn renewal_with_link_above_root(mut self, leaves: Vec<Vec<u8>>) -> Self {
        let algorithm = self.current_algorithm();
        let link = self.in_chain_link(algorithm);
        let tree = vec![DigestValueGroup::new(leaves)];
        let tree_root = root(algorithm, &tree);
        let imprint = combine_group(
            &DigestEngine::new(),
            algorithm,
            SiblingOrder::BinaryAscending,
            &[tree_root.value, link],
        );
        let ats = self.stamp_imprint(algorithm, tree, imprint);
        self.push(ats);
        self
    }

    /// Start a new chain: the chain link plus `leaves` at level 0
    pub fn new_chain(self, algorithm: DigestAlgorithm, leaves: Vec<Vec<u8>>) -> Self {
        let link = self.chain_link(algorithm);
        self.new_chain_with_link(algorithm, link, leaves)
    }

    /// Start a new chain embedding `link` in place of the real chain link
    pub fn new_chain_with_link(
        mut self,
        algorithm: DigestAlgorithm,
        link: Vec<u8>,
        leaves: Vec<Vec<u8>>,
    ) -> Self {
        let mut level = vec![link];
        level.extend(leaves);
        let ats = self.stamp(algorithm, vec![DigestValueGroup::new(level)], None);
        self.chains.push(ArchiveTimeStampChain::new(algorithm, vec![ats]));
        self
    }

    /// Digest of the last time-stamp of the current chain, as the next chain must embed it
    pub fn chain_link(&self, algorithm: DigestAlgorithm) -> Vec<u8> {
        let last = self
            .chains
            .last()
            .and_then(|c| c.last())
            .expect("no previous chain");
        digest(algorithm, self.link_bytes(last)).value
    }

    pub fn build(self) -> EvidenceRecord {
        EvidenceRecord::new(self.chains)
    }

    fn current_algorithm(&self) -> DigestAlgorithm {
        self.chains.last().expect("no chain").digest_algorithm
    }

    fn in_chain_link(&self, algorithm: DigestAlgorithm) -> Vec<u8> {
        let previous = self.chains.last().and_then(|c| c.last()).expect("no chain");
        digest(algorithm, self.link_bytes(previous)).value
    }

    fn link_bytes<'a>(&self, ats: &'a ArchiveTimeStamp) -> &'a [u8] {
        if self.token_only_links {
            &ats.timestamp.encoded
        } else {
            ats.encoded_or_token()
        }
    }

    fn push(&mut self, ats: ArchiveTimeStamp) {
        self.chains
            .last_mut()
            .expect("no chain")
            .archive_time_stamps
            .push(ats);
    }

    fn stamp(
        &mut self,
        algorithm: DigestAlgorithm,
        tree: Vec<DigestValueGroup>,
        imprint: Option<Digest>,
    ) -> ArchiveTimeStamp {
        let imprint = imprint.unwrap_or_else(|| root(algorithm, &tree));
        self.stamp_imprint(algorithm, tree, imprint)
    }

    fn stamp_imprint(
        &mut self,
        algorithm: DigestAlgorithm,
        tree: Vec<DigestValueGroup>,
        imprint: Digest,
    ) -> ArchiveTimeStamp {
        self.serial += 1;
        let token = TimestampToken::from_encoded(format!("token {}", self.serial).into_bytes())
            .with_message_imprint(imprint);
        let mut ats = ArchiveTimeStamp::new(tree, token);
        ats.digest_algorithm = Some(algorithm);
        if self.encode_archive_time_stamps {
            ats.encoded = format!("archive time-stamp {}", self.serial).into_bytes();
        }
        ats
    }
}
