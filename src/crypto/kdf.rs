//! Secret-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is the only tunable.  It is stored in every v1
//! envelope so changing the configured default never orphans files that
//! were sealed earlier.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, SealError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Lowest iteration count we accept.
pub const MIN_ITERATIONS: u32 = 1_000;

/// Highest iteration count we accept (bounds the work an envelope can demand).
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Configurable PBKDF2 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 rounds (default: 100 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Reject iteration counts outside `MIN_ITERATIONS..=MAX_ITERATIONS`.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(SealError::KeyDerivationFailed(format!(
                "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(SealError::KeyDerivationFailed(format!(
                "PBKDF2 iterations must be at most {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        Ok(())
    }
}

/// A 32-byte symmetric key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive a 32-byte key from secret material and a salt.
///
/// The same secret + salt + params always produce the same key.
pub fn derive_key(secret: &[u8], salt: &[u8; SALT_LEN], params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;
    if secret.is_empty() {
        return Err(SealError::KeyDerivationFailed(
            "secret material cannot be empty".into(),
        ));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret, salt, params.iterations, &mut key);
    let derived = DerivedKey::new(key);
    key.zeroize();

    Ok(derived)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
