//! Integration tests for the metalseal crypto module.

use metalseal::crypto::{derive_key, generate_nonce, generate_salt, open, seal, KdfParams};
use metalseal::errors::SealError;

const SEED: &[u8] = b"6.2831853|3.1415926|1.6180339|2.7182818";

const FAST: KdfParams = KdfParams { iterations: 1_000 };

fn unhex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn counting_salt() -> [u8; 16] {
    let mut salt = [0u8; 16];
    for (i, b) in salt.iter_mut().enumerate() {
        *b = i as u8;
    }
    salt
}

// ---------------------------------------------------------------------------
// Key derivation (PBKDF2-HMAC-SHA256)
// ---------------------------------------------------------------------------

#[test]
fn derive_key_same_inputs_same_output() {
    let salt = generate_salt();

    let key1 = derive_key(SEED, &salt, &FAST).expect("derive 1");
    let key2 = derive_key(SEED, &salt, &FAST).expect("derive 2");

    assert_eq!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn derive_key_matches_fixed_vector() {
    // Independent PBKDF2-HMAC-SHA256 computation, 1000 rounds.
    let key = derive_key(SEED, &counting_salt(), &FAST).expect("derive");
    assert_eq!(
        key.as_bytes().to_vec(),
        unhex("2a938e7a3d20822d1ccf5ad62b03e969c8f2dc1c3116098490f1e3ab2fa0e6f3")
    );
}

#[test]
fn derive_key_different_salts_different_keys() {
    let key1 = derive_key(SEED, &generate_salt(), &FAST).expect("derive 1");
    let key2 = derive_key(SEED, &generate_salt(), &FAST).expect("derive 2");

    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn derive_key_different_secrets_different_keys() {
    let salt = generate_salt();

    let key1 = derive_key(b"secret-one", &salt, &FAST).expect("derive 1");
    let key2 = derive_key(b"secret-two", &salt, &FAST).expect("derive 2");

    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

// ---------------------------------------------------------------------------
// AEAD
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip_with_associated_data() {
    let key = derive_key(SEED, &generate_salt(), &FAST).unwrap();
    let nonce = generate_nonce();
    let plaintext = b"telemetry 2026-10-16 ok";

    let sealed = seal(&key, &nonce, plaintext, Some(&b"header"[..])).expect("seal");
    assert_eq!(sealed.len(), plaintext.len() + 16);

    let opened = open(&key, &nonce, &sealed, Some(&b"header"[..])).expect("open");
    assert_eq!(opened.as_slice(), plaintext);
}

#[test]
fn open_with_different_associated_data_fails() {
    let key = derive_key(SEED, &generate_salt(), &FAST).unwrap();
    let nonce = generate_nonce();

    let sealed = seal(&key, &nonce, b"data", Some(&b"v1"[..])).unwrap();
    let result = open(&key, &nonce, &sealed, Some(&b"v2"[..]));
    assert!(matches!(result, Err(SealError::AuthenticationFailure)));

    let result = open(&key, &nonce, &sealed, None);
    assert!(matches!(result, Err(SealError::AuthenticationFailure)));
}

#[test]
fn open_with_wrong_key_fails() {
    let salt = generate_salt();
    let key = derive_key(b"right", &salt, &FAST).unwrap();
    let wrong = derive_key(b"wrong", &salt, &FAST).unwrap();
    let nonce = generate_nonce();

    let sealed = seal(&key, &nonce, b"data", None).unwrap();
    assert!(matches!(
        open(&wrong, &nonce, &sealed, None),
        Err(SealError::AuthenticationFailure)
    ));
}

#[test]
fn every_flipped_bit_is_detected() {
    let key = derive_key(SEED, &generate_salt(), &FAST).unwrap();
    let nonce = generate_nonce();
    let sealed = seal(&key, &nonce, b"abc", None).unwrap();

    for byte in 0..sealed.len() {
        for bit in 0..8 {
            let mut tampered = sealed.clone();
            tampered[byte] ^= 1 << bit;
            assert!(
                open(&key, &nonce, &tampered, None).is_err(),
                "flip of byte {byte} bit {bit} went unnoticed"
            );
        }
    }
}

#[test]
fn truncated_ciphertext_fails() {
    let key = derive_key(SEED, &generate_salt(), &FAST).unwrap();
    let nonce = generate_nonce();
    let sealed = seal(&key, &nonce, b"some bytes", None).unwrap();

    let result = open(&key, &nonce, &sealed[..sealed.len() - 1], None);
    assert!(matches!(result, Err(SealError::AuthenticationFailure)));
}

#[test]
fn nonces_are_fresh() {
    assert_ne!(generate_nonce(), generate_nonce());
}
