//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Secrets
pub use crate::{SecretBytes, with_secret};

// Hashing
pub use crate::{CredentialHash, HashAlgorithm, Salt};

// Matchers
pub use crate::{
    AllowAllCredentialsMatcher, CredentialsMatcher, HashedCredentialsMatcher,
    SimpleCredentialsMatcher, StoredCredential, StoredFormat,
};
