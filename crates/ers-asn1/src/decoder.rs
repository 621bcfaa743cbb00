//! DER decoder producing the evidence record model

use crate::asn1::{ArchiveTimeStampAsn1, EvidenceRecordAsn1};
use crate::error::{Error, Result};
use der::{Decode, Encode};
use ers_tsa::AlgorithmIdentifier;
use ers_types::{
    ArchiveTimeStamp, ArchiveTimeStampChain, CryptographicInformation,
    CryptographicInformationType, DigestAlgorithm, DigestValueGroup, EvidenceRecord,
    EvidenceRecordDecoder, TimestampToken,
};
use x509_cert::attr::Attribute;
use x509_cert::crl::CertificateList;
use x509_cert::Certificate;

/// Decoder for RFC 4998 DER evidence records
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc4998Decoder;

impl Rfc4998Decoder {
    /// Create the decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode `bytes`, reporting crate-level errors
    pub fn decode_der(&self, bytes: &[u8]) -> Result<EvidenceRecord> {
        let asn1 = EvidenceRecordAsn1::from_der_bytes(bytes)?;
        self.convert(&asn1)
    }

    /// Convert an already decoded structure
    pub fn convert(&self, asn1: &EvidenceRecordAsn1) -> Result<EvidenceRecord> {
        if asn1.version != 1 {
            return Err(Error::Unsupported(format!("version {}", asn1.version)));
        }
        if asn1.encryption_info.is_some() {
            return Err(Error::Unsupported(
                "encrypted evidence records are not supported".to_string(),
            ));
        }

        let declared = asn1
            .digest_algorithms
            .iter()
            .map(to_algorithm)
            .collect::<Result<Vec<_>>>()?;

        let mut chains = Vec::with_capacity(asn1.archive_time_stamp_sequence.len());
        for (c, chain) in asn1.archive_time_stamp_sequence.iter().enumerate() {
            let mut archive_time_stamps = Vec::with_capacity(chain.len());
            for (i, ats) in chain.iter().enumerate() {
                let converted = convert_archive_time_stamp(ats)
                    .map_err(|e| annotate(e, c, i))?;
                if let Some(alg) = converted.digest_algorithm {
                    if !declared.contains(&alg) {
                        tracing::warn!(
                            "Archive time-stamp {}/{} uses {} which is not declared by the record",
                            c,
                            i,
                            alg
                        );
                    }
                }
                archive_time_stamps.push(converted);
            }

            let digest_algorithm = archive_time_stamps
                .first()
                .and_then(|ats| ats.digest_algorithm)
                .or_else(|| declared.first().copied())
                .ok_or_else(|| {
                    Error::MissingAlgorithm(format!("chain {} has no archive time-stamp", c))
                })?;

            chains.push(ArchiveTimeStampChain {
                digest_algorithm,
                archive_time_stamps,
                encoded: chain.to_der()?,
            });
        }

        let cryptographic_information = asn1
            .crypto_infos
            .as_deref()
            .map(cryptographic_information)
            .unwrap_or_default();

        tracing::debug!(
            "Decoded RFC 4998 evidence record: {} chains, {} archive time-stamps",
            chains.len(),
            chains.iter().map(|c| c.archive_time_stamps.len()).sum::<usize>()
        );

        let mut record = EvidenceRecord::new(chains);
        record.version = asn1.version;
        record.cryptographic_information = cryptographic_information;
        Ok(record)
    }
}

impl EvidenceRecordDecoder for Rfc4998Decoder {
    fn decode(&self, bytes: &[u8]) -> ers_types::Result<EvidenceRecord> {
        Ok(self.decode_der(bytes)?)
    }

    fn is_supported(&self, bytes: &[u8]) -> bool {
        // SEQUENCE, then INTEGER version
        bytes.first() == Some(&0x30) && EvidenceRecordAsn1::from_der_bytes(bytes).is_ok()
    }
}

fn annotate(e: Error, chain: usize, index: usize) -> Error {
    match e {
        Error::MissingAlgorithm(msg) => {
            Error::MissingAlgorithm(format!("archive time-stamp {}/{}: {}", chain, index, msg))
        }
        other => other,
    }
}

fn to_algorithm(id: &AlgorithmIdentifier) -> Result<DigestAlgorithm> {
    id.to_digest_algorithm()
        .ok_or_else(|| Error::UnknownAlgorithm(id.algorithm.to_string()))
}

fn convert_archive_time_stamp(ats: &ArchiveTimeStampAsn1) -> Result<ArchiveTimeStamp> {
    let token_der = ats.time_stamp.to_der()?;
    let timestamp = match ers_tsa::decode_token(&token_der) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Unable to read time-stamp token: {}", e);
            TimestampToken::from_encoded(token_der)
        }
    };

    let digest_algorithm = match &ats.digest_algorithm {
        Some(id) => to_algorithm(id)?,
        // Without [0] the tree uses the algorithm of the token's imprint
        None => timestamp
            .message_imprint
            .as_ref()
            .map(|imprint| imprint.algorithm)
            .ok_or_else(|| {
                Error::MissingAlgorithm("no digestAlgorithm and unreadable token".to_string())
            })?,
    };

    let hash_tree = ats
        .reduced_hashtree
        .as_ref()
        .map(|groups| {
            groups
                .iter()
                .map(|partial| {
                    DigestValueGroup::new(
                        partial.iter().map(|value| value.as_bytes().to_vec()).collect(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ArchiveTimeStamp {
        digest_algorithm: Some(digest_algorithm),
        hash_tree,
        timestamp,
        encoded: ats.to_der()?,
        cryptographic_information: Vec::new(),
    })
}

fn cryptographic_information(attributes: &[Attribute]) -> Vec<CryptographicInformation> {
    let mut result = Vec::new();
    for attribute in attributes {
        for value in attribute.values.iter() {
            let content = match value.to_der() {
                Ok(der) => der,
                Err(e) => {
                    tracing::warn!("Skipping unencodable cryptographic information: {}", e);
                    continue;
                }
            };
            let kind = if Certificate::from_der(&content).is_ok() {
                CryptographicInformationType::Cert
            } else if CertificateList::from_der(&content).is_ok() {
                CryptographicInformationType::Crl
            } else {
                tracing::debug!(
                    "Cryptographic information of type {} kept as opaque data",
                    attribute.oid
                );
                CryptographicInformationType::Other
            };
            result.push(CryptographicInformation::new(kind, content));
        }
    }
    result
}
