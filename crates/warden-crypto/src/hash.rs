//! Salted, iterated credential digests using the SHA-2 family.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Digest algorithm used to hash credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// SHA-256 (32-byte output).
    #[default]
    Sha256,
    /// SHA-384 (48-byte output).
    Sha384,
    /// SHA-512 (64-byte output).
    Sha512,
}

impl HashAlgorithm {
    fn digest_parts(self, parts: &[&[u8]]) -> Vec<u8> {
        fn run<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
            let mut hasher = D::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().to_vec()
        }

        match self {
            Self::Sha256 => run::<Sha256>(parts),
            Self::Sha384 => run::<Sha384>(parts),
            Self::Sha512 => run::<Sha512>(parts),
        }
    }

    /// Output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha-256"),
            Self::Sha384 => write!(f, "sha-384"),
            Self::Sha512 => write!(f, "sha-512"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// A computed credential digest.
///
/// The first round digests `salt || source`; every further round digests
/// the previous round's output.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl CredentialHash {
    /// Hash `source` with an optional salt and `iterations` rounds.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidIterations`] if `iterations` is zero.
    pub fn compute(
        algorithm: HashAlgorithm,
        source: &[u8],
        salt: Option<&[u8]>,
        iterations: u32,
    ) -> CryptoResult<Self> {
        if iterations == 0 {
            return Err(CryptoError::InvalidIterations);
        }

        let mut current = Zeroizing::new(match salt {
            Some(salt) => algorithm.digest_parts(&[salt, source]),
            None => algorithm.digest_parts(&[source]),
        });
        for _ in 1..iterations {
            current = Zeroizing::new(algorithm.digest_parts(&[current.as_slice()]));
        }

        Ok(Self {
            algorithm,
            bytes: current.to_vec(),
        })
    }

    /// Algorithm that produced this hash.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Encode as base64 string.
    #[must_use]
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "CredentialHash({}, {}..)", self.algorithm, &hex[..hex.len().min(16)])
    }
}

impl AsRef<[u8]> for CredentialHash {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sha256_vector() {
        let hash = CredentialHash::compute(HashAlgorithm::Sha256, b"abc", None, 1).unwrap();
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_salt_is_prepended() {
        let salted =
            CredentialHash::compute(HashAlgorithm::Sha256, b"c", Some(b"ab".as_slice()), 1)
                .unwrap();
        let plain = CredentialHash::compute(HashAlgorithm::Sha256, b"abc", None, 1).unwrap();
        assert_eq!(salted, plain);
    }

    #[test]
    fn test_iterations_rehash_output() {
        let once = CredentialHash::compute(HashAlgorithm::Sha256, b"secret", None, 1).unwrap();
        let twice = CredentialHash::compute(HashAlgorithm::Sha256, b"secret", None, 2).unwrap();
        let manual =
            CredentialHash::compute(HashAlgorithm::Sha256, once.as_bytes(), None, 1).unwrap();
        assert_eq!(twice, manual);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = CredentialHash::compute(HashAlgorithm::Sha512, b"x", None, 0).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidIterations));
    }

    #[test]
    fn test_output_lengths() {
        for alg in [HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512] {
            let hash = CredentialHash::compute(alg, b"x", None, 1).unwrap();
            assert_eq!(hash.as_bytes().len(), alg.output_len());
        }
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("sha512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }
}
