//! Objects covered by each time-stamp
//!
//! A time-stamp covers the data objects and the evidence record, every
//! time-stamp of the earlier chains, its predecessor in its own chain, and
//! the certificates and revocation data of earlier archive time-stamps.

use ers_crypto::sha256;
use ers_types::{
    CryptographicInformation, EvidenceRecord, Hex, ReferenceValidation, TimestampToken,
    TimestampedObjectCategory, TimestampedReference,
};

/// Identifier of a time-stamp token
pub fn timestamp_id(token: &TimestampToken) -> String {
    format!("T-{}", Hex::encode(&sha256(&token.encoded)))
}

/// Identifier of the evidence record, its own id when it has one
pub fn evidence_record_id(record: &EvidenceRecord) -> String {
    if let Some(id) = &record.id {
        return id.clone();
    }
    let mut encoded = Vec::new();
    for (_, _, ats) in record.archive_time_stamps() {
        encoded.extend_from_slice(ats.encoded_or_token());
    }
    format!("ER-{}", Hex::encode(&sha256(&encoded)))
}

fn cryptographic_reference(info: &CryptographicInformation) -> TimestampedReference {
    let id = Hex::encode(&sha256(&info.content));
    if info.kind.is_revocation() {
        TimestampedReference::new(TimestampedObjectCategory::Revocation, format!("R-{}", id))
    } else {
        TimestampedReference::new(TimestampedObjectCategory::Certificate, format!("C-{}", id))
    }
}

fn signed_data_reference(reference: &ReferenceValidation) -> Option<TimestampedReference> {
    let id = match (&reference.name, &reference.digest) {
        (Some(name), _) => name.clone(),
        (None, Some(digest)) => digest.to_hex().into_string(),
        (None, None) => return None,
    };
    Some(TimestampedReference::new(TimestampedObjectCategory::SignedData, id))
}

fn push_unique(target: &mut Vec<TimestampedReference>, reference: TimestampedReference) {
    if !target.contains(&reference) {
        target.push(reference);
    }
}

/// Covered objects of every archive time-stamp, indexed `[chain][index]`
///
/// `data_references` is the record-level reference list; only found
/// objects are covered.
pub fn timestamped_references(
    record: &EvidenceRecord,
    data_references: &[ReferenceValidation],
) -> Vec<Vec<Vec<TimestampedReference>>> {
    let mut base = Vec::new();
    for reference in data_references.iter().filter(|r| r.found) {
        if let Some(signed) = signed_data_reference(reference) {
            push_unique(&mut base, signed);
        }
    }
    push_unique(
        &mut base,
        TimestampedReference::new(
            TimestampedObjectCategory::EvidenceRecord,
            evidence_record_id(record),
        ),
    );

    let mut earlier_chains: Vec<TimestampedReference> = Vec::new();
    let mut validation_data: Vec<TimestampedReference> = Vec::new();
    let mut result = Vec::with_capacity(record.archive_time_stamp_sequence.len());

    for chain in &record.archive_time_stamp_sequence {
        let mut chain_refs = Vec::with_capacity(chain.archive_time_stamps.len());
        let mut this_chain: Vec<TimestampedReference> = Vec::new();

        for (i, ats) in chain.archive_time_stamps.iter().enumerate() {
            let mut covered = base.clone();
            for reference in earlier_chains.iter().chain(&validation_data) {
                push_unique(&mut covered, reference.clone());
            }
            if i > 0 {
                let predecessor = &chain.archive_time_stamps[i - 1];
                push_unique(
                    &mut covered,
                    TimestampedReference::new(
                        TimestampedObjectCategory::Timestamp,
                        timestamp_id(&predecessor.timestamp),
                    ),
                );
            }
            chain_refs.push(covered);

            this_chain.push(TimestampedReference::new(
                TimestampedObjectCategory::Timestamp,
                timestamp_id(&ats.timestamp),
            ));
            for info in &ats.cryptographic_information {
                push_unique(&mut validation_data, cryptographic_reference(info));
            }
        }

        earlier_chains.extend(this_chain);
        result.push(chain_refs);
    }
    result
}
