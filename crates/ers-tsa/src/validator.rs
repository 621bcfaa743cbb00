//! Time-stamp token validation seam
//!
//! The verification engine computes the digest a token is expected to
//! attest to and hands it to a [`TimestampTokenValidator`]. The default
//! [`ImprintValidator`] compares message imprints only; certificate path
//! and CMS signature validation are supplied by the caller through the
//! same trait.

use crate::parse::parse_timestamp_token;
use chrono::{DateTime, Utc};
use ers_types::{Digest, TimestampToken};
use serde::{Deserialize, Serialize};

/// Outcome of the token's signature check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureStatus {
    /// The signature and signer were verified
    Valid,
    /// The signature or signer was rejected
    Invalid(String),
    /// No signature check was performed
    NotChecked,
}

impl SignatureStatus {
    /// Whether the signature was positively verified
    pub fn is_valid(&self) -> bool {
        matches!(self, SignatureStatus::Valid)
    }
}

/// What a token validator reports for one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    /// The token carries a message imprint
    pub message_imprint_found: bool,
    /// The imprint equals the expected digest
    pub message_imprint_intact: bool,
    /// Signature verification outcome, passed through unchanged
    pub signature: SignatureStatus,
    /// Generation time, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<DateTime<Utc>>,
}

impl TokenValidation {
    /// A token whose imprint could not be read
    pub fn imprint_missing() -> Self {
        Self {
            message_imprint_found: false,
            message_imprint_intact: false,
            signature: SignatureStatus::NotChecked,
            generation_time: None,
        }
    }
}

/// Validates one time-stamp token against an expected imprint
pub trait TimestampTokenValidator {
    /// Check `token` against the digest it should attest to
    fn validate(&self, token: &TimestampToken, expected: &Digest) -> TokenValidation;

    /// Message imprint carried by `token`, used when no expected digest
    /// can be built for it
    fn message_imprint(&self, token: &TimestampToken) -> Option<Digest> {
        ImprintValidator::imprint_of(token).map(|(imprint, _)| imprint)
    }
}

impl<T: TimestampTokenValidator + ?Sized> TimestampTokenValidator for &T {
    fn validate(&self, token: &TimestampToken, expected: &Digest) -> TokenValidation {
        (**self).validate(token, expected)
    }

    fn message_imprint(&self, token: &TimestampToken) -> Option<Digest> {
        (**self).message_imprint(token)
    }
}

/// Compares the expected digest with the token's message imprint
#[derive(Debug, Clone, Copy, Default)]
pub struct ImprintValidator;

impl ImprintValidator {
    /// Create the validator
    pub fn new() -> Self {
        Self
    }

    /// Message imprint and generation time of `token`, parsing the encoding
    /// when the model does not carry them
    pub fn imprint_of(token: &TimestampToken) -> Option<(Digest, Option<DateTime<Utc>>)> {
        if let Some(imprint) = &token.message_imprint {
            return Some((imprint.clone(), token.generation_time));
        }
        match parse_timestamp_token(&token.encoded) {
            Ok(parsed) => Some((parsed.message_imprint, Some(parsed.generation_time))),
            Err(e) => {
                tracing::warn!("Time-stamp token has no readable message imprint: {}", e);
                None
            }
        }
    }
}

impl TimestampTokenValidator for ImprintValidator {
    fn validate(&self, token: &TimestampToken, expected: &Digest) -> TokenValidation {
        let Some((imprint, generation_time)) = Self::imprint_of(token) else {
            return TokenValidation::imprint_missing();
        };

        if imprint.algorithm != expected.algorithm {
            tracing::warn!(
                "Time-stamp imprint uses {}, archive time-stamp uses {}",
                imprint.algorithm,
                expected.algorithm
            );
        }
        let intact = imprint == *expected;
        tracing::debug!(
            "Message imprint {} {} expected {}",
            imprint,
            if intact { "matches" } else { "differs from" },
            expected
        );

        TokenValidation {
            message_imprint_found: true,
            message_imprint_intact: intact,
            signature: SignatureStatus::NotChecked,
            generation_time,
        }
    }
}
