//! Sensitive byte buffers that are wiped when dropped.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Owned sensitive bytes (passwords, decrypted credentials).
///
/// The buffer is zeroized on drop and never printed by `Debug`.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Take ownership of a buffer.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Copy a slice into a new secret buffer.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Borrow the secret bytes.
    ///
    /// Prefer [`SecretBytes::with_exposed`] so the borrow stays scoped.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Run `f` with the secret bytes borrowed for the duration of the call.
    pub fn with_exposed<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.0)
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Constant-time equality against another byte slice.
    #[must_use]
    pub fn ct_eq(&self, other: &[u8]) -> bool {
        // Length is not secret; ct_eq on slices of unequal length is false.
        bool::from(self.0.as_slice().ct_eq(other))
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.0.len())
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<String> for SecretBytes {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for SecretBytes {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for SecretBytes {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

/// Hand `bytes` to `f` and wipe them afterwards.
///
/// The buffer is zeroized on every exit path: normal return, an `Err`
/// returned by `f`, or a panic unwinding through it.
///
/// # Example
///
/// ```
/// use warden_crypto::with_secret;
///
/// let decrypted = b"hunter2".to_vec();
/// let len = with_secret(decrypted, |plain| plain.len());
/// assert_eq!(len, 7);
/// ```
pub fn with_secret<R>(bytes: Vec<u8>, f: impl FnOnce(&[u8]) -> R) -> R {
    let guard = Zeroizing::new(bytes);
    f(guard.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretBytes::from("hunter2");
        let debug = format!("{secret:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_ct_eq() {
        let secret = SecretBytes::from("password");
        assert!(secret.ct_eq(b"password"));
        assert!(!secret.ct_eq(b"passwore"));
        assert!(!secret.ct_eq(b"pass"));
    }

    #[test]
    fn test_with_exposed_scopes_borrow() {
        let secret = SecretBytes::from("abc");
        let upper = secret.with_exposed(|b| b.to_ascii_uppercase());
        assert_eq!(upper, b"ABC");
    }

    #[test]
    fn test_with_secret_propagates_result() {
        let result: Result<usize, &str> = with_secret(b"key".to_vec(), |_| Err("boom"));
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_zeroize_clears_buffer() {
        let mut secret = SecretBytes::from("sensitive");
        secret.zeroize();
        assert!(secret.is_empty());
    }
}
