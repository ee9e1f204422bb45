//! Vault module — sealing files into envelopes and back.
//!
//! This module provides:
//! - The binary envelope codec (`format`)
//! - Temp-file-then-rename writes (`atomic`)
//! - The high-level `Vault` seal/unseal engine (`transform`)
//! - Sealed-file age reporting (`age`)

pub mod age;
pub mod atomic;
pub mod format;
pub mod transform;

use std::path::Path;

use crate::errors::Result;

// Re-export the most commonly used items.
pub use age::{check_age, AgeReport};
pub use format::{Envelope, EnvelopeFormat, Header};
pub use transform::{sealed_path, unsealed_path, SealOptions, Stage, Vault, DEFAULT_SUFFIX};

/// Decode the envelope at `path` without touching the secret.
///
/// Useful for checking which format, secret version and KDF cost a
/// sealed file was written with.
pub fn inspect(path: &Path, format: EnvelopeFormat) -> Result<Envelope> {
    let data = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            crate::errors::SealError::SourceNotFound(path.to_path_buf())
        } else {
            e.into()
        }
    })?;
    Envelope::decode(&data, format)
}
