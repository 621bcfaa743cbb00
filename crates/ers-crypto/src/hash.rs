//! Hashing utilities using aws-lc-rs

use crate::error::{Error, Result};
use aws_lc_rs::digest::{self, Context, SHA1_FOR_LEGACY_USE_ONLY, SHA224, SHA256, SHA384, SHA512};
use ers_types::{Digest, DigestAlgorithm};

fn backend(algorithm: DigestAlgorithm) -> &'static digest::Algorithm {
    match algorithm {
        DigestAlgorithm::Sha1 => &SHA1_FOR_LEGACY_USE_ONLY,
        DigestAlgorithm::Sha224 => &SHA224,
        DigestAlgorithm::Sha256 => &SHA256,
        DigestAlgorithm::Sha384 => &SHA384,
        DigestAlgorithm::Sha512 => &SHA512,
    }
}

/// Hash data using SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = digest::digest(&SHA256, data);
    let mut result = [0u8; 32];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Stateless digest engine
///
/// Computes the digest of a byte string, of a concatenation of byte strings,
/// and of a list of digests. The algorithm is always passed explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestEngine;

impl DigestEngine {
    /// Create an engine
    pub fn new() -> Self {
        Self
    }

    /// Digest `data` with `algorithm`
    pub fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Digest {
        let output = digest::digest(backend(algorithm), data);
        Digest::new(algorithm, output.as_ref().to_vec())
    }

    /// Digest the concatenation of `parts`
    pub fn digest_concat<T: AsRef<[u8]>>(&self, algorithm: DigestAlgorithm, parts: &[T]) -> Digest {
        let mut calculator = DigestCalculator::new(algorithm);
        for part in parts {
            calculator.update(part.as_ref());
        }
        calculator.finalize()
    }

    /// Digest a list of digests in the given order
    ///
    /// Every input must be a well-formed digest of `algorithm`.
    pub fn digest_list(&self, algorithm: DigestAlgorithm, digests: &[Digest]) -> Result<Digest> {
        let mut calculator = DigestCalculator::new(algorithm);
        for d in digests {
            if d.algorithm != algorithm {
                return Err(Error::AlgorithmMismatch {
                    expected: algorithm,
                    actual: d.algorithm,
                });
            }
            if !d.has_valid_length() {
                return Err(Error::InvalidLength {
                    algorithm,
                    actual: d.value.len(),
                });
            }
            calculator.update(&d.value);
        }
        Ok(calculator.finalize())
    }
}

/// Incremental hasher for any supported algorithm
pub struct DigestCalculator {
    algorithm: DigestAlgorithm,
    context: Context,
}

impl DigestCalculator {
    /// Create a new hasher
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            context: Context::new(backend(algorithm)),
        }
    }

    /// Update the hasher with data
    pub fn update(&mut self, data: &[u8]) {
        self.context.update(data);
    }

    /// Finalize and get the digest
    pub fn finalize(self) -> Digest {
        let output = self.context.finish();
        Digest::new(self.algorithm, output.as_ref().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_sha256() {
        let hash = sha256(b"hello");
        assert_eq!(hash.len(), 32);

        // Known SHA-256 hash of "hello"
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
                .unwrap();
        assert_eq!(&hash[..], &expected[..]);
    }

    #[rstest]
    #[case(DigestAlgorithm::Sha1, "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case(
        DigestAlgorithm::Sha224,
        "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7"
    )]
    #[case(
        DigestAlgorithm::Sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    )]
    #[case(
        DigestAlgorithm::Sha384,
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7"
    )]
    #[case(
        DigestAlgorithm::Sha512,
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    )]
    fn test_known_answers(#[case] algorithm: DigestAlgorithm, #[case] expected: &str) {
        let digest = DigestEngine::new().digest(algorithm, b"abc");
        assert_eq!(digest.algorithm, algorithm);
        assert_eq!(hex::encode(&digest.value), expected);
        assert!(digest.has_valid_length());
    }

    #[test]
    fn test_incremental_matches_direct() {
        let mut calculator = DigestCalculator::new(DigestAlgorithm::Sha384);
        calculator.update(b"hel");
        calculator.update(b"lo");
        let incremental = calculator.finalize();

        let direct = DigestEngine::new().digest(DigestAlgorithm::Sha384, b"hello");
        assert_eq!(incremental, direct);
    }

    #[test]
    fn test_digest_concat() {
        let engine = DigestEngine::new();
        let concat = engine.digest_concat(DigestAlgorithm::Sha256, &[&b"ab"[..], &b"c"[..]]);
        assert_eq!(concat, engine.digest(DigestAlgorithm::Sha256, b"abc"));
    }

    #[test]
    fn test_digest_list() {
        let engine = DigestEngine::new();
        let a = engine.digest(DigestAlgorithm::Sha256, b"a");
        let b = engine.digest(DigestAlgorithm::Sha256, b"b");
        let combined = engine
            .digest_list(DigestAlgorithm::Sha256, &[a.clone(), b.clone()])
            .unwrap();
        let mut raw = a.value.clone();
        raw.extend_from_slice(&b.value);
        assert_eq!(combined, engine.digest(DigestAlgorithm::Sha256, &raw));
    }

    #[test]
    fn test_digest_list_rejects_foreign_algorithm() {
        let engine = DigestEngine::new();
        let a = engine.digest(DigestAlgorithm::Sha512, b"a");
        let err = engine.digest_list(DigestAlgorithm::Sha256, &[a]).unwrap_err();
        assert!(matches!(err, Error::AlgorithmMismatch { .. }));
    }

    #[test]
    fn test_digest_list_rejects_bad_length() {
        let engine = DigestEngine::new();
        let short = Digest::new(DigestAlgorithm::Sha256, vec![0u8; 31]);
        let err = engine.digest_list(DigestAlgorithm::Sha256, &[short]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { actual: 31, .. }));
    }
}
