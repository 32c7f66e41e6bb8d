//! Warden Crypto - Credential verification primitives.
//!
//! This crate provides:
//! - [`SecretBytes`] and [`with_secret`] for wipe-on-drop handling of
//!   passwords and decrypted credentials
//! - [`CredentialHash`]: salted, iterated SHA-2 digests
//! - The [`CredentialsMatcher`] family (plaintext, hashed, allow-all)
//! - Random [`Salt`] generation
//!
//! Digest algorithms come from `sha2`; comparisons use `subtle` so they run
//! in constant time.
//!
//! # Example
//!
//! ```
//! use warden_crypto::{
//!     CredentialHash, CredentialsMatcher, HashAlgorithm, HashedCredentialsMatcher, Salt,
//!     SecretBytes, StoredCredential,
//! };
//!
//! let salt = Salt::generate(16);
//! let digest =
//!     CredentialHash::compute(HashAlgorithm::Sha256, b"s3cret", Some(salt.as_bytes()), 1024)
//!         .unwrap();
//!
//! let stored = StoredCredential::new(digest.to_hex()).with_salt(salt.into_bytes());
//! let matcher = HashedCredentialsMatcher::new(HashAlgorithm::Sha256).with_iterations(1024);
//!
//! assert!(matcher.matches(&SecretBytes::from("s3cret"), &stored));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod hash;
mod matcher;
mod salt;
mod secret;

pub use error::{CryptoError, CryptoResult};
pub use hash::{CredentialHash, HashAlgorithm};
pub use matcher::{
    AllowAllCredentialsMatcher, CredentialsMatcher, HashedCredentialsMatcher,
    SimpleCredentialsMatcher, StoredCredential, StoredFormat,
};
pub use salt::{DEFAULT_SALT_LEN, Salt};
pub use secret::{SecretBytes, with_secret};
