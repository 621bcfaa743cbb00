//! Digest algorithm identifiers and algorithm-tagged digest values

use crate::encoding::Hex;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Digest algorithms understood by the verifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-1 (legacy records only)
    #[serde(rename = "SHA1")]
    Sha1,
    /// SHA-224
    #[serde(rename = "SHA224")]
    Sha224,
    /// SHA-256
    #[serde(rename = "SHA256")]
    Sha256,
    /// SHA-384
    #[serde(rename = "SHA384")]
    Sha384,
    /// SHA-512
    #[serde(rename = "SHA512")]
    Sha512,
}

impl DigestAlgorithm {
    /// All supported algorithms, weakest first
    pub const ALL: [DigestAlgorithm; 5] = [
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
    ];

    /// Get the digest size in bytes for this algorithm
    pub fn digest_size(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Get the dotted OID for this algorithm
    pub fn oid(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "1.3.14.3.2.26",
            DigestAlgorithm::Sha224 => "2.16.840.1.101.3.4.2.4",
            DigestAlgorithm::Sha256 => "2.16.840.1.101.3.4.2.1",
            DigestAlgorithm::Sha384 => "2.16.840.1.101.3.4.2.2",
            DigestAlgorithm::Sha512 => "2.16.840.1.101.3.4.2.3",
        }
    }

    /// Look up an algorithm by its dotted OID
    pub fn from_oid(oid: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.oid() == oid)
            .ok_or_else(|| Error::InvalidDigestAlgorithm(format!("unknown OID {}", oid)))
    }

    /// Check that `value` has the length this algorithm produces
    pub fn check_length(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.digest_size() {
            return Err(Error::InvalidEncoding(format!(
                "{} digest must be {} bytes, got {}",
                self,
                self.digest_size(),
                value.len()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => write!(f, "SHA1"),
            DigestAlgorithm::Sha224 => write!(f, "SHA224"),
            DigestAlgorithm::Sha256 => write!(f, "SHA256"),
            DigestAlgorithm::Sha384 => write!(f, "SHA384"),
            DigestAlgorithm::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    /// Accepts `SHA256`, `SHA-256`, `sha256` and `SHA2_256` style names as
    /// well as dotted OIDs.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains('.') {
            return Self::from_oid(s);
        }
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA224" | "SHA2224" => Ok(DigestAlgorithm::Sha224),
            "SHA256" | "SHA2256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" | "SHA2384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" | "SHA2512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(Error::InvalidDigestAlgorithm(s.to_string())),
        }
    }
}

/// A digest value tagged with the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    /// The algorithm used to produce this digest
    pub algorithm: DigestAlgorithm,
    /// The digest bytes (base64 encoded in JSON)
    #[serde(with = "crate::encoding::base64_bytes")]
    pub value: Vec<u8>,
}

impl Digest {
    /// Create a new digest
    pub fn new(algorithm: DigestAlgorithm, value: Vec<u8>) -> Self {
        Self { algorithm, value }
    }

    /// Get the digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// Get the digest as uppercase hex
    pub fn to_hex(&self) -> Hex {
        Hex::encode(&self.value)
    }

    /// Whether the value length matches the algorithm
    pub fn has_valid_length(&self) -> bool {
        self.value.len() == self.algorithm.digest_size()
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SHA256", DigestAlgorithm::Sha256)]
    #[case("sha-256", DigestAlgorithm::Sha256)]
    #[case("SHA2_384", DigestAlgorithm::Sha384)]
    #[case("Sha512", DigestAlgorithm::Sha512)]
    #[case("SHA-1", DigestAlgorithm::Sha1)]
    #[case("2.16.840.1.101.3.4.2.4", DigestAlgorithm::Sha224)]
    fn test_parse_algorithm(#[case] input: &str, #[case] expected: DigestAlgorithm) {
        assert_eq!(input.parse::<DigestAlgorithm>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        assert!("MD5".parse::<DigestAlgorithm>().is_err());
        assert!(DigestAlgorithm::from_oid("1.2.3.4").is_err());
    }

    #[test]
    fn test_oid_round_trip_for_every_algorithm() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(DigestAlgorithm::from_oid(alg.oid()).unwrap(), alg);
        }
    }

    #[test]
    fn test_check_length() {
        assert!(DigestAlgorithm::Sha256.check_length(&[0u8; 32]).is_ok());
        assert!(DigestAlgorithm::Sha256.check_length(&[0u8; 20]).is_err());
    }

    #[test]
    fn test_digest_serde() {
        let digest = Digest::new(DigestAlgorithm::Sha1, vec![0u8; 20]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, r#"{"algorithm":"SHA1","value":"AAAAAAAAAAAAAAAAAAAAAAAAAAA="}"#);
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn test_digest_display() {
        let digest = Digest::new(DigestAlgorithm::Sha256, vec![0xde, 0xad]);
        assert_eq!(digest.to_string(), "SHA256:DEAD");
        assert!(!digest.has_valid_length());
    }
}
