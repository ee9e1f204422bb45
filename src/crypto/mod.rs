//! Cryptographic primitives for metalseal.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption with optional associated data (`encryption`)
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)

pub mod encryption;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_key, ...};
pub use encryption::{generate_nonce, open, seal, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, generate_salt, DerivedKey, KdfParams, KEY_LEN, SALT_LEN};
