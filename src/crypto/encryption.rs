//! AES-256-GCM authenticated encryption.
//!
//! Unlike a nonce-prepending API, the nonce is an explicit argument here:
//! the envelope codec decides where it lives on disk.  Callers must pass
//! a fresh nonce from `generate_nonce` for every `seal`.
//!
//! Output of `seal`:
//!   [ ciphertext | 16-byte auth tag ]

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use super::kdf::DerivedKey;
use crate::errors::{Result, SealError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt and authenticate `plaintext`.
///
/// `associated_data` is authenticated but not encrypted; `None` and an
/// empty slice are equivalent.
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    associated_data: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| SealError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let payload = Payload {
        msg: plaintext,
        aad: associated_data.unwrap_or_default(),
    };

    cipher
        .encrypt(Nonce::from_slice(nonce), payload)
        .map_err(|e| SealError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Verify and decrypt data produced by `seal`.
///
/// Every failure (wrong key, flipped bit, truncated input, different
/// associated data) maps to the same `AuthenticationFailure`.  Nothing is
/// returned unless the tag verifies.
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext_with_tag: &[u8],
    associated_data: Option<&[u8]>,
) -> Result<Zeroizing<Vec<u8>>> {
    if ciphertext_with_tag.len() < TAG_LEN {
        return Err(SealError::AuthenticationFailure);
    }

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| SealError::AuthenticationFailure)?;

    let payload = Payload {
        msg: ciphertext_with_tag,
        aad: associated_data.unwrap_or_default(),
    };

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), payload)
        .map_err(|_| SealError::AuthenticationFailure)?;

    Ok(Zeroizing::new(plaintext))
}

/// Generate a random 12-byte nonce from the OS RNG.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut out = [0u8; NONCE_LEN];
    out.copy_from_slice(&nonce);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> DerivedKey {
        DerivedKey::new([byte; 32])
    }

    #[test]
    fn empty_plaintext_yields_bare_tag() {
        let nonce = generate_nonce();
        let sealed = seal(&key(1), &nonce, b"", None).unwrap();
        assert_eq!(sealed.len(), TAG_LEN);

        let opened = open(&key(1), &nonce, &sealed, None).unwrap();
        assert!(opened.is_empty());
    }

    #[test]
    fn none_and_empty_associated_data_are_equivalent() {
        let nonce = generate_nonce();
        let sealed = seal(&key(2), &nonce, b"payload", None).unwrap();
        let opened = open(&key(2), &nonce, &sealed, Some(&[][..])).unwrap();
        assert_eq!(opened.as_slice(), b"payload");
    }

    #[test]
    fn shorter_than_tag_is_rejected() {
        let result = open(&key(3), &[0u8; NONCE_LEN], &[0u8; TAG_LEN - 1], None);
        assert!(matches!(result, Err(SealError::AuthenticationFailure)));
    }

    #[test]
    fn wrong_nonce_fails() {
        let nonce = generate_nonce();
        let sealed = seal(&key(4), &nonce, b"payload", None).unwrap();
        let mut other = nonce;
        other[0] ^= 0x01;
        assert!(open(&key(4), &other, &sealed, None).is_err());
    }
}
