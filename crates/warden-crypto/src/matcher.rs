//! Credential comparison strategies.
//!
//! A [`CredentialsMatcher`] decides whether credentials submitted at login
//! match the credentials an account store holds for that account.

use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::CryptoResult;
use crate::hash::{CredentialHash, HashAlgorithm};
use crate::secret::SecretBytes;

/// Credentials as held by an account store, with an optional salt.
#[derive(Clone, Default)]
pub struct StoredCredential {
    value: SecretBytes,
    salt: Option<Vec<u8>>,
}

impl StoredCredential {
    /// Stored credential without a salt.
    #[must_use]
    pub fn new(value: impl Into<SecretBytes>) -> Self {
        Self {
            value: value.into(),
            salt: None,
        }
    }

    /// Attach a salt.
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// The stored value (plaintext, raw digest, or encoded digest).
    #[must_use]
    pub fn value(&self) -> &SecretBytes {
        &self.value
    }

    /// The salt, if any.
    #[must_use]
    pub fn salt(&self) -> Option<&[u8]> {
        self.salt.as_deref()
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("value", &self.value)
            .field("has_salt", &self.salt.is_some())
            .finish()
    }
}

/// Compares submitted credentials against stored ones.
pub trait CredentialsMatcher: Send + Sync + fmt::Debug {
    /// Returns `true` if `provided` matches `stored`.
    fn matches(&self, provided: &SecretBytes, stored: &StoredCredential) -> bool;
}

/// Plaintext comparison in constant time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCredentialsMatcher;

impl CredentialsMatcher for SimpleCredentialsMatcher {
    fn matches(&self, provided: &SecretBytes, stored: &StoredCredential) -> bool {
        stored.value().with_exposed(|expected| provided.ct_eq(expected))
    }
}

/// Accepts any credentials.
///
/// Only for realms whose tokens were already verified elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllCredentialsMatcher;

impl CredentialsMatcher for AllowAllCredentialsMatcher {
    fn matches(&self, _provided: &SecretBytes, _stored: &StoredCredential) -> bool {
        true
    }
}

/// How a hashed credential is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredFormat {
    /// Raw digest bytes.
    Raw,
    /// Lowercase or uppercase hex text.
    #[default]
    Hex,
    /// Standard base64 text.
    Base64,
}

impl StoredFormat {
    fn decode(self, stored: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
        match self {
            Self::Raw => Some(Zeroizing::new(stored.to_vec())),
            Self::Hex => hex::decode(stored.trim_ascii()).ok().map(Zeroizing::new),
            Self::Base64 => base64::engine::general_purpose::STANDARD
                .decode(stored.trim_ascii())
                .ok()
                .map(Zeroizing::new),
        }
    }
}

/// Hashes the submitted credentials and compares the digest bytes against
/// the decoded stored digest.
///
/// # Example
///
/// ```
/// use warden_crypto::{
///     CredentialHash, CredentialsMatcher, HashAlgorithm, HashedCredentialsMatcher,
///     SecretBytes, StoredCredential,
/// };
///
/// let salt = b"salt".as_slice();
/// let stored = CredentialHash::compute(HashAlgorithm::Sha256, b"secret", Some(salt), 3)
///     .unwrap()
///     .to_hex();
/// let matcher = HashedCredentialsMatcher::new(HashAlgorithm::Sha256).with_iterations(3);
/// let stored = StoredCredential::new(stored).with_salt(salt.to_vec());
///
/// assert!(matcher.matches(&SecretBytes::from("secret"), &stored));
/// assert!(!matcher.matches(&SecretBytes::from("wrong"), &stored));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HashedCredentialsMatcher {
    algorithm: HashAlgorithm,
    iterations: u32,
    format: StoredFormat,
}

impl HashedCredentialsMatcher {
    /// Single-iteration matcher expecting hex-encoded stored digests.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            iterations: 1,
            format: StoredFormat::Hex,
        }
    }

    /// Number of hash rounds (values below 1 are clamped to 1).
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    /// Encoding of the stored digest.
    #[must_use]
    pub fn with_format(mut self, format: StoredFormat) -> Self {
        self.format = format;
        self
    }

    /// Hash `provided` exactly as this matcher would during comparison.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialHash::compute`] errors.
    pub fn hash_provided(
        &self,
        provided: &SecretBytes,
        salt: Option<&[u8]>,
    ) -> CryptoResult<CredentialHash> {
        provided.with_exposed(|plain| {
            CredentialHash::compute(self.algorithm, plain, salt, self.iterations)
        })
    }
}

impl CredentialsMatcher for HashedCredentialsMatcher {
    fn matches(&self, provided: &SecretBytes, stored: &StoredCredential) -> bool {
        let Some(expected) = stored.value().with_exposed(|raw| self.format.decode(raw)) else {
            tracing::debug!(format = ?self.format, "stored credential could not be decoded");
            return false;
        };

        match self.hash_provided(provided, stored.salt()) {
            Ok(actual) => bool::from(actual.as_bytes().ct_eq(expected.as_slice())),
            Err(e) => {
                tracing::debug!(error = %e, "failed to hash submitted credentials");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_matcher() {
        let stored = StoredCredential::new("secret");
        assert!(SimpleCredentialsMatcher.matches(&SecretBytes::from("secret"), &stored));
        assert!(!SimpleCredentialsMatcher.matches(&SecretBytes::from("Secret"), &stored));
        assert!(!SimpleCredentialsMatcher.matches(&SecretBytes::from(""), &stored));
    }

    #[test]
    fn test_allow_all_matcher() {
        let stored = StoredCredential::new("anything");
        assert!(AllowAllCredentialsMatcher.matches(&SecretBytes::from("else"), &stored));
    }

    #[test]
    fn test_hashed_matcher_hex() {
        let digest = CredentialHash::compute(HashAlgorithm::Sha256, b"pw", None, 1).unwrap();
        let matcher = HashedCredentialsMatcher::new(HashAlgorithm::Sha256);
        assert!(matcher.matches(&SecretBytes::from("pw"), &StoredCredential::new(digest.to_hex())));
        // Uppercase hex decodes to the same bytes.
        let upper = digest.to_hex().to_uppercase();
        assert!(matcher.matches(&SecretBytes::from("pw"), &StoredCredential::new(upper)));
    }

    #[test]
    fn test_hashed_matcher_base64_and_raw() {
        let digest =
            CredentialHash::compute(HashAlgorithm::Sha512, b"pw", Some(b"s".as_slice()), 2)
                .unwrap();

        let b64 = HashedCredentialsMatcher::new(HashAlgorithm::Sha512)
            .with_iterations(2)
            .with_format(StoredFormat::Base64);
        let stored = StoredCredential::new(digest.to_base64()).with_salt(b"s".to_vec());
        assert!(b64.matches(&SecretBytes::from("pw"), &stored));

        let raw = b64.with_format(StoredFormat::Raw);
        let stored = StoredCredential::new(digest.as_bytes()).with_salt(b"s".to_vec());
        assert!(raw.matches(&SecretBytes::from("pw"), &stored));
    }

    #[test]
    fn test_hashed_matcher_wrong_salt_or_iterations() {
        let digest =
            CredentialHash::compute(HashAlgorithm::Sha256, b"pw", Some(b"a".as_slice()), 1)
                .unwrap();
        let matcher = HashedCredentialsMatcher::new(HashAlgorithm::Sha256);
        let wrong_salt = StoredCredential::new(digest.to_hex()).with_salt(b"b".to_vec());
        assert!(!matcher.matches(&SecretBytes::from("pw"), &wrong_salt));

        let right_salt = StoredCredential::new(digest.to_hex()).with_salt(b"a".to_vec());
        assert!(!matcher.with_iterations(2).matches(&SecretBytes::from("pw"), &right_salt));
    }

    #[test]
    fn test_hashed_matcher_undecodable_stored_value() {
        let matcher = HashedCredentialsMatcher::new(HashAlgorithm::Sha256);
        assert!(!matcher.matches(&SecretBytes::from("pw"), &StoredCredential::new("not-hex!")));
    }

    #[test]
    fn test_stored_credential_debug_redacts() {
        let stored = StoredCredential::new("plaintext").with_salt(b"salt".to_vec());
        let debug = format!("{stored:?}");
        assert!(!debug.contains("plaintext"));
        assert!(debug.contains("has_salt: true"));
    }
}
