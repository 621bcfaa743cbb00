//! Shared builders for DER evidence records

#![allow(dead_code)]

use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{EncapsulatedContentInfo, SignedData, SignerInfos};
use const_oid::ObjectIdentifier;
use der::asn1::{GeneralizedTime, Int, OctetString, SetOfVec};
use der::{Any, Decode, Encode, Tag};
use ers_asn1::{ArchiveTimeStampAsn1, EvidenceRecordAsn1};
use ers_crypto::DigestEngine;
use ers_hashtree::{HashTreeVerifier, SiblingOrder};
use ers_tsa::asn1::{Asn1MessageImprint, TstInfo, OID_SIGNED_DATA, OID_TST_INFO};
use ers_types::{Digest, DigestAlgorithm, DigestValueGroup};
use std::time::Duration;

/// Unsigned RFC 3161 token over `imprint`
pub fn token(imprint: &Digest) -> ContentInfo {
    let tst_info = TstInfo {
        version: 1,
        policy: ObjectIdentifier::new_unwrap("1.2.3.4.1"),
        message_imprint: Asn1MessageImprint::new(imprint.algorithm.into(), imprint.value.clone())
            .unwrap(),
        serial_number: Int::new(&[0x2a]).unwrap(),
        gen_time: GeneralizedTime::from_unix_duration(Duration::from_secs(1_600_000_000)).unwrap(),
        accuracy: None,
        ordering: false,
        nonce: None,
        tsa: None,
        extensions: None,
    };
    let signed_data = SignedData {
        version: CmsVersion::V3,
        digest_algorithms: SetOfVec::new(),
        encap_content_info: EncapsulatedContentInfo {
            econtent_type: OID_TST_INFO,
            econtent: Some(Any::new(Tag::OctetString, tst_info.to_der().unwrap()).unwrap()),
        },
        certificates: None,
        crls: None,
        signer_infos: SignerInfos(SetOfVec::new()),
    };
    ContentInfo {
        content_type: OID_SIGNED_DATA,
        content: Any::encode_from(&signed_data).unwrap(),
    }
}

/// Digest of `data`
pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Digest {
    DigestEngine::new().digest(algorithm, data)
}

/// Root of `groups`
pub fn root(algorithm: DigestAlgorithm, groups: &[Vec<Vec<u8>>]) -> Digest {
    let groups: Vec<DigestValueGroup> = groups.iter().cloned().map(DigestValueGroup::new).collect();
    HashTreeVerifier::new(algorithm, SiblingOrder::BinaryAscending)
        .root(&groups)
        .unwrap()
}

/// Archive time-stamp over `groups`, time-stamping their root
pub fn archive_time_stamp(
    algorithm: DigestAlgorithm,
    groups: Vec<Vec<Vec<u8>>>,
    declare_algorithm: bool,
) -> ArchiveTimeStampAsn1 {
    let imprint = root(algorithm, &groups);
    ArchiveTimeStampAsn1 {
        digest_algorithm: declare_algorithm.then(|| algorithm.into()),
        attributes: None,
        reduced_hashtree: Some(
            groups
                .into_iter()
                .map(|g| g.into_iter().map(|v| OctetString::new(v).unwrap()).collect())
                .collect(),
        ),
        time_stamp: token(&imprint),
    }
}

/// Single-chain record
pub fn record(
    algorithm: DigestAlgorithm,
    chains: Vec<Vec<ArchiveTimeStampAsn1>>,
) -> EvidenceRecordAsn1 {
    EvidenceRecordAsn1 {
        version: 1,
        digest_algorithms: vec![algorithm.into()],
        crypto_infos: None,
        encryption_info: None,
        archive_time_stamp_sequence: chains,
    }
}

/// Round-trip an encodable value through DER
pub fn reencode<T: Encode + for<'a> Decode<'a>>(value: &T) -> T {
    T::from_der(&value.to_der().unwrap()).unwrap()
}
