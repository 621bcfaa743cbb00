//! DER evidence records built from scratch

#![allow(dead_code)]

use cms::content_info::{CmsVersion, ContentInfo};
use cms::signed_data::{EncapsulatedContentInfo, SignedData, SignerInfos};
use const_oid::ObjectIdentifier;
use der::asn1::{GeneralizedTime, Int, OctetString, SetOfVec};
use der::{Any, Encode, Tag};
use ers::asn1::{ArchiveTimeStampAsn1, EvidenceRecordAsn1};
use ers::crypto::DigestEngine;
use ers::hashtree::{HashTreeVerifier, SiblingOrder};
use ers::tsa::asn1::{Asn1MessageImprint, TstInfo, OID_SIGNED_DATA, OID_TST_INFO};
use ers::types::{Digest, DigestAlgorithm, DigestValueGroup};
use std::time::Duration;

pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Digest {
    DigestEngine::new().digest(algorithm, data)
}

/// Unsigned RFC 3161 token attesting to `imprint`
pub fn token(imprint: &Digest, serial: u8) -> ContentInfo {
    let tst_info = TstInfo {
        version: 1,
        policy: ObjectIdentifier::new_unwrap("1.2.3.4.1"),
        message_imprint: Asn1MessageImprint::new(imprint.algorithm.into(), imprint.value.clone())
            .unwrap(),
        serial_number: Int::new(&[serial]).unwrap(),
        gen_time: GeneralizedTime::from_unix_duration(Duration::from_secs(
            1_600_000_000 + u64::from(serial) * 86_400,
        ))
        .unwrap(),
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

/// Archive time-stamp whose token attests to the root of `level`
pub fn archive_time_stamp(algorithm: DigestAlgorithm, level: Vec<Vec<u8>>, serial: u8) -> ArchiveTimeStampAsn1 {
    let imprint = HashTreeVerifier::new(algorithm, SiblingOrder::BinaryAscending)
        .root(&[DigestValueGroup::new(level.clone())])
        .unwrap();
    ArchiveTimeStampAsn1 {
        digest_algorithm: Some(algorithm.into()),
        attributes: None,
        reduced_hashtree: Some(vec![level
            .into_iter()
            .map(|v| OctetString::new(v).unwrap())
            .collect()]),
        time_stamp: token(&imprint, serial),
    }
}

/// Time-stamp renewal of `previous`
pub fn renewal(algorithm: DigestAlgorithm, previous: &ArchiveTimeStampAsn1, serial: u8) -> ArchiveTimeStampAsn1 {
    let link = digest(algorithm, &previous.to_der().unwrap()).value;
    archive_time_stamp(algorithm, vec![link], serial)
}

pub fn record(algorithms: Vec<DigestAlgorithm>, chains: Vec<Vec<ArchiveTimeStampAsn1>>) -> Vec<u8> {
    EvidenceRecordAsn1 {
        version: 1,
        digest_algorithms: algorithms.into_iter().map(Into::into).collect(),
        crypto_infos: None,
        encryption_info: None,
        archive_time_stamp_sequence: chains,
    }
    .to_der()
    .unwrap()
}
