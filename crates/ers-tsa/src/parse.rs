//! RFC 3161 time-stamp token parsing
//!
//! The structure is:
//! ```text
//! TimeStampToken ::= ContentInfo
//! ContentInfo ::= SEQUENCE {
//!   contentType OBJECT IDENTIFIER (id-signedData),
//!   content [0] EXPLICIT SignedData }
//!
//! SignedData ::= SEQUENCE {
//!   version INTEGER,
//!   digestAlgorithms SET OF AlgorithmIdentifier,
//!   encapContentInfo EncapsulatedContentInfo,
//!   certificates [0] IMPLICIT CertificateSet OPTIONAL,
//!   ... }
//!
//! EncapsulatedContentInfo ::= SEQUENCE {
//!   eContentType OBJECT IDENTIFIER (id-ct-TSTInfo),
//!   eContent [0] EXPLICIT OCTET STRING }
//! ```
//! A `TimeStampResp` wrapping the token is accepted as well.

use crate::asn1::{TimeStampResp, TstInfo, OID_SIGNED_DATA, OID_TST_INFO};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use cms::cert::CertificateChoices;
use cms::content_info::ContentInfo;
use cms::signed_data::SignedData;
use der::{Decode, Encode};
use ers_types::{Digest, TimestampToken};
use x509_cert::ext::pkix::name::GeneralName;

/// Fields of a time-stamp token relevant to evidence record validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
    /// DER encoding of the token (ContentInfo), without any response wrapper
    pub encoded: Vec<u8>,
    /// Digest the token attests to
    pub message_imprint: Digest,
    /// Time at which the token was generated
    pub generation_time: DateTime<Utc>,
    /// Serial number bytes
    pub serial_number: Vec<u8>,
    /// Policy OID, dotted
    pub policy: String,
    /// TSA name, when the token carries one
    pub tsa_name: Option<String>,
    /// DER certificates embedded in the SignedData
    pub certificates: Vec<Vec<u8>>,
}

impl ParsedToken {
    /// Convert into the encoding-agnostic token model
    pub fn into_model(self) -> TimestampToken {
        TimestampToken {
            encoded: self.encoded,
            message_imprint: Some(self.message_imprint),
            generation_time: Some(self.generation_time),
            tsa_name: self.tsa_name,
        }
    }
}

/// Parse a time-stamp token, or a response carrying one
pub fn parse_timestamp_token(bytes: &[u8]) -> Result<ParsedToken> {
    let (content_info, encoded) = match TimeStampResp::from_der_bytes(bytes) {
        Ok(resp) => {
            if !resp.status.is_success() {
                return Err(Error::ResponseFailure(resp.status.status));
            }
            let token = resp.time_stamp_token.ok_or(Error::NoToken)?;
            let encoded = token
                .to_der()
                .map_err(|e| Error::Asn1(format!("failed to re-encode token: {}", e)))?;
            let content_info = ContentInfo::from_der(&encoded)
                .map_err(|e| Error::Parse(format!("failed to decode ContentInfo: {}", e)))?;
            (content_info, encoded)
        }
        Err(_) => {
            let content_info = ContentInfo::from_der(bytes)
                .map_err(|e| Error::Parse(format!("failed to decode TimeStampToken: {}", e)))?;
            (content_info, bytes.to_vec())
        }
    };

    if content_info.content_type != OID_SIGNED_DATA {
        return Err(Error::Parse(
            "ContentInfo content type is not SignedData".to_string(),
        ));
    }

    let signed_data_der = content_info
        .content
        .to_der()
        .map_err(|e| Error::Asn1(format!("failed to encode SignedData content: {}", e)))?;
    let signed_data = SignedData::from_der(&signed_data_der)
        .map_err(|e| Error::Parse(format!("failed to decode SignedData: {}", e)))?;

    if signed_data.encap_content_info.econtent_type != OID_TST_INFO {
        return Err(Error::Parse("encap content type is not TSTInfo".to_string()));
    }

    let econtent = signed_data
        .encap_content_info
        .econtent
        .as_ref()
        .ok_or(Error::NoTstInfo)?;
    // The content is an Any wrapping an OCTET STRING that contains the TSTInfo
    let tst_info = TstInfo::from_der_bytes(econtent.value())
        .map_err(|e| Error::Parse(format!("failed to decode TSTInfo: {}", e)))?;

    let algorithm = tst_info
        .message_imprint
        .hash_algorithm
        .to_digest_algorithm()
        .ok_or_else(|| {
            Error::UnsupportedAlgorithm(tst_info.message_imprint.hash_algorithm.algorithm.to_string())
        })?;
    let message_imprint = Digest::new(
        algorithm,
        tst_info.message_imprint.hashed_message.as_bytes().to_vec(),
    );

    let generation_time = DateTime::<Utc>::from(tst_info.gen_time.to_system_time());
    tracing::debug!(
        "Parsed time-stamp token: imprint {}, generated {}",
        message_imprint,
        generation_time
    );

    Ok(ParsedToken {
        encoded,
        message_imprint,
        generation_time,
        serial_number: tst_info.serial_number.as_bytes().to_vec(),
        policy: tst_info.policy.to_string(),
        tsa_name: tst_info.tsa.as_ref().and_then(general_name_to_string),
        certificates: extract_certificates(&signed_data),
    })
}

/// Parse `encoded` into the token model
pub fn decode_token(encoded: &[u8]) -> Result<TimestampToken> {
    parse_timestamp_token(encoded).map(ParsedToken::into_model)
}

fn general_name_to_string(name: &GeneralName) -> Option<String> {
    match name {
        GeneralName::DirectoryName(dn) => Some(dn.to_string()),
        GeneralName::Rfc822Name(s) => Some(s.to_string()),
        GeneralName::DnsName(s) => Some(s.to_string()),
        GeneralName::UniformResourceIdentifier(s) => Some(s.to_string()),
        _ => None,
    }
}

/// DER certificates carried by the SignedData
fn extract_certificates(signed_data: &SignedData) -> Vec<Vec<u8>> {
    let mut certificates = Vec::new();

    if let Some(cert_set) = &signed_data.certificates {
        for cert_choice in cert_set.0.iter() {
            match cert_choice {
                CertificateChoices::Certificate(cert) => match cert.to_der() {
                    Ok(der) => certificates.push(der),
                    Err(e) => tracing::warn!("Skipping unencodable certificate: {}", e),
                },
                CertificateChoices::Other(_) => {
                    tracing::debug!("Skipping non-standard certificate format");
                }
            }
        }
    }

    certificates
}
