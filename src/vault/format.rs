//! Binary envelope format.
//!
//! Two layouts are supported.  All fields are fixed width, so offsets
//! are implicit and there are no length prefixes.
//!
//! `legacy` (unversioned, as written by earlier releases):
//!
//! ```text
//! [salt: 16][nonce: 12][ciphertext + tag]
//! ```
//!
//! `v1` (default):
//!
//! ```text
//! [version: 1 = 0x01][secret version: 1][iterations: 4 BE][salt: 16][nonce: 12][ciphertext + tag]
//! ```
//!
//! - **Version**: format identifier, so later KDF/AEAD changes stay decodable.
//! - **Secret version**: `version` of the constant set used at seal time.
//! - **Iterations**: PBKDF2 round count used at seal time.
//!
//! The six v1 header bytes are fed to AES-GCM as associated data, so
//! editing any of them makes authentication fail.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, MAX_ITERATIONS, MIN_ITERATIONS};
use crate::crypto::{NONCE_LEN, SALT_LEN};
use crate::errors::{Result, SealError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Version byte written at offset 0 of a v1 envelope.
pub const V1_VERSION: u8 = 0x01;

/// Size of the v1 prefix: version + secret version + iterations.
const V1_PREFIX_LEN: usize = 6;

/// Fixed header length of a legacy envelope (salt + nonce).
pub const LEGACY_HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Fixed header length of a v1 envelope.
pub const V1_HEADER_LEN: usize = V1_PREFIX_LEN + SALT_LEN + NONCE_LEN;

// ---------------------------------------------------------------------------
// EnvelopeFormat / Header
// ---------------------------------------------------------------------------

/// Which envelope layout to read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeFormat {
    /// Bare salt, nonce, ciphertext.  No header, no associated data.
    Legacy,
    /// Version byte, secret version and KDF iterations ahead of the salt.
    #[default]
    V1,
}

impl EnvelopeFormat {
    /// Number of bytes before the ciphertext.
    pub fn header_len(self) -> usize {
        match self {
            Self::Legacy => LEGACY_HEADER_LEN,
            Self::V1 => V1_HEADER_LEN,
        }
    }
}

impl fmt::Display for EnvelopeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::V1 => f.write_str("v1"),
        }
    }
}

/// Format-specific metadata carried ahead of the salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Legacy,
    V1 { secret_version: u8, iterations: u32 },
}

impl Header {
    pub fn format(&self) -> EnvelopeFormat {
        match self {
            Self::Legacy => EnvelopeFormat::Legacy,
            Self::V1 { .. } => EnvelopeFormat::V1,
        }
    }

    /// KDF parameters recorded in the header, if any.
    pub fn kdf_params(&self) -> Option<KdfParams> {
        match *self {
            Self::Legacy => None,
            Self::V1 { iterations, .. } => Some(KdfParams { iterations }),
        }
    }

    /// The bytes authenticated alongside the ciphertext.
    pub fn associated_data(&self) -> Option<Vec<u8>> {
        match *self {
            Self::Legacy => None,
            Self::V1 {
                secret_version,
                iterations,
            } => {
                let mut ad = Vec::with_capacity(V1_PREFIX_LEN);
                ad.push(V1_VERSION);
                ad.push(secret_version);
                ad.extend_from_slice(&iterations.to_be_bytes());
                Some(ad)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub header: Header,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// AEAD output: ciphertext followed by the 16-byte tag.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize to the on-disk byte layout.
    pub fn encode(&self) -> Vec<u8> {
        let header_len = self.header.format().header_len();
        let mut buf = Vec::with_capacity(header_len + self.ciphertext.len());

        if let Some(prefix) = self.header.associated_data() {
            buf.extend_from_slice(&prefix);
        }
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    /// Parse bytes laid out in `format`.
    ///
    /// Only structure is checked here; authenticity is the AEAD's job.
    pub fn decode(data: &[u8], format: EnvelopeFormat) -> Result<Self> {
        let header_len = format.header_len();
        if data.len() < header_len {
            return Err(SealError::MalformedEnvelope(format!(
                "{} bytes is shorter than the {header_len}-byte {format} header",
                data.len()
            )));
        }

        let (header, rest) = match format {
            EnvelopeFormat::Legacy => (Header::Legacy, data),
            EnvelopeFormat::V1 => {
                let version = data[0];
                if version != V1_VERSION {
                    return Err(SealError::MalformedEnvelope(format!(
                        "unsupported version {version}, expected {V1_VERSION}"
                    )));
                }
                let secret_version = data[1];
                let iterations = u32::from_be_bytes([data[2], data[3], data[4], data[5]]);
                if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
                    return Err(SealError::MalformedEnvelope(format!(
                        "iteration count {iterations} is out of range"
                    )));
                }
                (
                    Header::V1 {
                        secret_version,
                        iterations,
                    },
                    &data[V1_PREFIX_LEN..],
                )
            }
        };

        let (salt_bytes, rest) = rest.split_at(SALT_LEN);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(salt_bytes);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        Ok(Self {
            header,
            salt,
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }
}
