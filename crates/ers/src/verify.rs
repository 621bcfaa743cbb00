//! High-level verification API
//!
//! Decodes a record and hands it to the validation engine in one call.

use crate::error::{Error, Result};
use ers_asn1::Rfc4998Decoder;
use ers_tsa::{ImprintValidator, TimestampTokenValidator};
use ers_types::{EvidenceRecord, EvidenceRecordDecoder, JsonDecoder, ValidationMaterial};
use ers_verify::{EvidenceRecordValidation, EvidenceRecordValidator, ValidationPolicy};

/// Container encoding of an evidence record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// RFC 4998 DER
    Der,
    /// JSON form of the model
    Json,
}

impl RecordFormat {
    /// Guess the encoding from the first significant byte
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.iter().find(|b| !b.is_ascii_whitespace())? {
            0x30 => Some(RecordFormat::Der),
            b'{' => Some(RecordFormat::Json),
            _ => None,
        }
    }
}

/// Decode `bytes` in whichever supported encoding they use
pub fn decode(bytes: &[u8]) -> Result<EvidenceRecord> {
    match RecordFormat::detect(bytes) {
        Some(RecordFormat::Der) => Ok(Rfc4998Decoder::new().decode_der(bytes)?),
        Some(RecordFormat::Json) => Ok(JsonDecoder.decode(bytes)?),
        None => Err(Error::UnknownFormat),
    }
}

/// A verifier for encoded evidence records
pub struct Verifier<V = ImprintValidator> {
    validator: EvidenceRecordValidator<V>,
}

impl Verifier {
    /// Create a verifier with the default policy
    pub fn new() -> Self {
        Self::with_policy(ValidationPolicy::default())
    }

    /// Create a verifier with `policy`
    pub fn with_policy(policy: ValidationPolicy) -> Self {
        Self {
            validator: EvidenceRecordValidator::with_policy(policy),
        }
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: TimestampTokenValidator> Verifier<V> {
    /// Check time-stamp tokens with `token_validator`
    pub fn with_token_validator<W: TimestampTokenValidator>(self, token_validator: W) -> Verifier<W> {
        Verifier {
            validator: self.validator.with_token_validator(token_validator),
        }
    }

    /// Decode and validate a record in either encoding
    pub fn verify(&self, bytes: &[u8], material: &ValidationMaterial) -> Result<EvidenceRecordValidation> {
        let record = decode(bytes)?;
        self.verify_record(&record, material)
    }

    /// Decode and validate a DER record
    pub fn verify_der(&self, der: &[u8], material: &ValidationMaterial) -> Result<EvidenceRecordValidation> {
        let record = Rfc4998Decoder::new().decode_der(der)?;
        self.verify_record(&record, material)
    }

    /// Decode and validate a record in its JSON form
    pub fn verify_json(&self, json: &str, material: &ValidationMaterial) -> Result<EvidenceRecordValidation> {
        let record = EvidenceRecord::from_json(json)?;
        self.verify_record(&record, material)
    }

    /// Validate an already decoded record
    pub fn verify_record(
        &self,
        record: &EvidenceRecord,
        material: &ValidationMaterial,
    ) -> Result<EvidenceRecordValidation> {
        tracing::debug!(
            "Verifying evidence record with {} chains, {} time-stamps",
            record.archive_time_stamp_sequence.len(),
            record.timestamp_count()
        );
        Ok(self.validator.validate(record, material)?)
    }
}

/// Validate a DER evidence record with the default policy
pub fn validate_der(der: &[u8], material: &ValidationMaterial) -> Result<EvidenceRecordValidation> {
    Verifier::new().verify_der(der, material)
}

/// Validate an evidence record in its JSON form with the default policy
pub fn validate_json(json: &str, material: &ValidationMaterial) -> Result<EvidenceRecordValidation> {
    Verifier::new().verify_json(json, material)
}
