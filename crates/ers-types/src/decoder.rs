//! Decoder interface for evidence record containers

use crate::error::{Error, Result};
use crate::record::EvidenceRecord;

/// Turns a container encoding into the evidence record model
pub trait EvidenceRecordDecoder {
    /// Decode `bytes` into a record
    fn decode(&self, bytes: &[u8]) -> Result<EvidenceRecord>;

    /// Cheap probe: does `bytes` look like a record this decoder understands
    fn is_supported(&self, bytes: &[u8]) -> bool {
        self.decode(bytes).is_ok()
    }
}

/// Decoder for the JSON form of the model
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl EvidenceRecordDecoder for JsonDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<EvidenceRecord> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::Decode(format!("record is not UTF-8 JSON: {}", e)))?;
        EvidenceRecord::from_json(text)
    }

    fn is_supported(&self, bytes: &[u8]) -> bool {
        bytes
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|b| *b == b'{')
            && self.decode(bytes).is_ok()
    }
}
