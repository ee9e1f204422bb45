//! Secret material consumed by the key derivation step.
//!
//! This module provides:
//! - The `Secret` byte buffer and the `SecretSource` trait (here)
//! - The versioned named-constant set and its file loader (`constants`)

pub mod constants;

use zeroize::Zeroizing;

use crate::errors::{Result, SealError};

pub use constants::{ConstantSet, Constants, ConstantsFile};

/// Raw secret material plus the version of the set it was built from.
///
/// The bytes are wiped from memory on drop.
pub struct Secret {
    version: u8,
    bytes: Zeroizing<Vec<u8>>,
}

impl Secret {
    /// Wrap secret bytes.  Empty material is rejected.
    pub fn new(version: u8, bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(SealError::SecretUnavailable(
                "secret material is empty".into(),
            ));
        }
        Ok(Self {
            version,
            bytes: Zeroizing::new(bytes),
        })
    }

    /// Version tag of the material (stored in v1 envelope headers).
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Access the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("version", &self.version)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Anything that can hand out the secret for one seal/unseal call.
///
/// Implementations fail with `SealError::SecretUnavailable` when their
/// backing material is missing or malformed.
pub trait SecretSource {
    fn secret(&self) -> Result<Secret>;
}

impl<S: SecretSource + ?Sized> SecretSource for &S {
    fn secret(&self) -> Result<Secret> {
        (**self).secret()
    }
}

impl<S: SecretSource + ?Sized> SecretSource for Box<S> {
    fn secret(&self) -> Result<Secret> {
        (**self).secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            Secret::new(1, Vec::new()),
            Err(SealError::SecretUnavailable(_))
        ));
    }

    #[test]
    fn debug_hides_bytes() {
        let secret = Secret::new(3, b"hunter2".to_vec()).unwrap();
        let shown = format!("{secret:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("version: 3"));
    }
}
