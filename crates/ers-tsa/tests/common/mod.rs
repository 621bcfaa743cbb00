//! Shared helpers for building unsigned RFC 3161 tokens

#![allow(dead_code)]

use cms::content_info::ContentInfo;
use cms::signed_data::{EncapsulatedContentInfo, SignedData, SignerInfos};
use const_oid::ObjectIdentifier;
use der::asn1::{GeneralizedTime, Int, SetOfVec};
use der::{Any, Decode, Encode, Tag};
use ers_tsa::asn1::{Asn1MessageImprint, TstInfo, OID_SIGNED_DATA, OID_TST_INFO};
use ers_tsa::TimeStampResp;
use ers_types::Digest;
use std::time::Duration;
use x509_cert::ext::pkix::name::GeneralName;

/// Build a TSTInfo over `imprint` generated at `unix_secs`
pub fn tst_info(imprint: &Digest, unix_secs: u64, tsa: Option<GeneralName>) -> TstInfo {
    TstInfo {
        version: 1,
        policy: ObjectIdentifier::new_unwrap("1.2.3.4.1"),
        message_imprint: Asn1MessageImprint::new(imprint.algorithm.into(), imprint.value.clone())
            .unwrap(),
        serial_number: Int::new(&[0x01, 0x02]).unwrap(),
        gen_time: GeneralizedTime::from_unix_duration(Duration::from_secs(unix_secs)).unwrap(),
        accuracy: None,
        ordering: false,
        nonce: None,
        tsa,
        extensions: None,
    }
}

/// Wrap a TSTInfo into a ContentInfo/SignedData token without signers
pub fn token_from_tst_info(tst_info: &TstInfo) -> Vec<u8> {
    let tst_der = tst_info.to_der().unwrap();
    let signed_data = SignedData {
        version: cms::content_info::CmsVersion::V3,
        digest_algorithms: SetOfVec::new(),
        encap_content_info: EncapsulatedContentInfo {
            econtent_type: OID_TST_INFO,
            econtent: Some(Any::new(Tag::OctetString, tst_der).unwrap()),
        },
        certificates: None,
        crls: None,
        signer_infos: SignerInfos(SetOfVec::new()),
    };
    let content_info = ContentInfo {
        content_type: OID_SIGNED_DATA,
        content: Any::encode_from(&signed_data).unwrap(),
    };
    content_info.to_der().unwrap()
}

/// Build a token over `imprint`
pub fn build_token(imprint: &Digest, unix_secs: u64) -> Vec<u8> {
    token_from_tst_info(&tst_info(imprint, unix_secs, None))
}

/// Wrap a token into a granted TimeStampResp
pub fn granted_response(token: &[u8]) -> Vec<u8> {
    let resp = TimeStampResp {
        status: ers_tsa::asn1::PkiStatusInfo {
            status: 0,
            fail_info: None,
        },
        time_stamp_token: Some(Any::from_der(token).unwrap()),
    };
    resp.to_der().unwrap()
}
