//! Random salt generation.

use rand::RngCore;
use rand::rngs::OsRng;

/// Default salt length in bytes.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Random bytes used to salt credential hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// Generate `len` random bytes from the OS RNG.
    #[must_use]
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Raw salt bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Default for Salt {
    fn default() -> Self {
        Self::generate(DEFAULT_SALT_LEN)
    }
}
