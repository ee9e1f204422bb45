//! Seal and unseal files on disk.
//!
//! `Vault` ties the secret source, KDF, AEAD and envelope codec together:
//!
//! ```text
//! seal:   read -> secret -> salt -> KDF -> nonce -> AES-GCM -> encode -> write -> remove source
//! unseal: suffix check -> read -> decode -> secret -> KDF -> verify/decrypt -> write -> remove source
//! ```
//!
//! The destination is committed with `write_atomic` before the source is
//! removed, so a failure at any step leaves the source file intact.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::atomic::write_atomic;
use super::format::{Envelope, EnvelopeFormat, Header};
use crate::crypto::{self, derive_key, generate_nonce, generate_salt, KdfParams};
use crate::errors::{Result, SealError};
use crate::secret::SecretSource;

/// Suffix appended to sealed files unless configured otherwise.
pub const DEFAULT_SUFFIX: &str = ".metal";

/// Stages a single seal/unseal call moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Reading,
    Deriving,
    Transforming,
    Writing,
    Finalizing,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Reading => "reading",
            Self::Deriving => "deriving",
            Self::Transforming => "transforming",
            Self::Writing => "writing",
            Self::Finalizing => "finalizing",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Knobs for a `Vault`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealOptions {
    /// Suffix appended on seal and stripped on unseal.
    pub suffix: String,
    /// KDF params used when sealing (and when unsealing legacy envelopes).
    pub kdf: KdfParams,
    /// Envelope layout written on seal and expected on unseal.
    pub format: EnvelopeFormat,
    /// Replace an existing destination instead of failing.
    pub overwrite: bool,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            kdf: KdfParams::default(),
            format: EnvelopeFormat::default(),
            overwrite: false,
        }
    }
}

impl SealOptions {
    pub fn validate(&self) -> Result<()> {
        validate_suffix(&self.suffix)?;
        self.kdf
            .validate()
            .map_err(|e| SealError::ConfigError(e.to_string()))
    }
}

/// The seal/unseal engine.
pub struct Vault<S> {
    source: S,
    options: SealOptions,
}

impl<S: SecretSource> Vault<S> {
    /// Build a vault over `source`, rejecting invalid options up front.
    pub fn new(source: S, options: SealOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { source, options })
    }

    pub fn options(&self) -> &SealOptions {
        &self.options
    }

    /// Path a sealed copy of `path` is written to.
    pub fn sealed_path(&self, path: &Path) -> PathBuf {
        sealed_path(path, &self.options.suffix)
    }

    /// Path an unsealed copy of `path` is written to.
    pub fn unsealed_path(&self, path: &Path) -> Result<PathBuf> {
        unsealed_path(path, &self.options.suffix)
    }

    /// Encrypt `path` into `path + suffix` and remove `path`.
    ///
    /// Returns the sealed path.
    pub fn seal(&self, path: &Path) -> Result<PathBuf> {
        match self.seal_file(path) {
            Ok(dest) => {
                stage("seal", Stage::Idle, path);
                info!(source = %path.display(), sealed = %dest.display(), "sealed");
                Ok(dest)
            }
            Err(e) => {
                debug!(op = "seal", stage = %Stage::Failed, path = %path.display(), error = %e);
                Err(e)
            }
        }
    }

    /// Verify and decrypt `path` into `path` without its suffix, then
    /// remove `path`.
    ///
    /// On any failure the sealed file is untouched and no output is left.
    /// Returns the plaintext path.
    pub fn unseal(&self, path: &Path) -> Result<PathBuf> {
        match self.unseal_file(path) {
            Ok(dest) => {
                stage("unseal", Stage::Idle, path);
                info!(sealed = %path.display(), restored = %dest.display(), "unsealed");
                Ok(dest)
            }
            Err(e) => {
                debug!(op = "unseal", stage = %Stage::Failed, path = %path.display(), error = %e);
                Err(e)
            }
        }
    }

    fn seal_file(&self, path: &Path) -> Result<PathBuf> {
        let dest = self.sealed_path(path);

        // Refuse names the unseal side could not map back to `path`.
        if self.unsealed_path(&dest)? != path {
            return Err(SealError::InvalidExtension {
                path: dest,
                suffix: self.options.suffix.clone(),
            });
        }

        stage("seal", Stage::Reading, path);
        let plaintext = read_source(path)?;
        self.ensure_destination_free(&dest)?;

        stage("seal", Stage::Deriving, path);
        let secret = self.source.secret()?;
        let salt = generate_salt();
        let key = derive_key(secret.as_bytes(), &salt, &self.options.kdf)?;

        stage("seal", Stage::Transforming, path);
        let header = match self.options.format {
            EnvelopeFormat::Legacy => Header::Legacy,
            EnvelopeFormat::V1 => Header::V1 {
                secret_version: secret.version(),
                iterations: self.options.kdf.iterations,
            },
        };
        let nonce = generate_nonce();
        let associated_data = header.associated_data();
        let ciphertext = crypto::seal(&key, &nonce, &plaintext, associated_data.as_deref())?;
        let envelope = Envelope {
            header,
            salt,
            nonce,
            ciphertext,
        };

        stage("seal", Stage::Writing, &dest);
        write_atomic(&dest, &envelope.encode(), path, self.options.overwrite)?;

        stage("seal", Stage::Finalizing, path);
        remove_source(path);

        Ok(dest)
    }

    fn unseal_file(&self, path: &Path) -> Result<PathBuf> {
        let dest = self.unsealed_path(path)?;

        stage("unseal", Stage::Reading, path);
        let data = read_source(path)?;
        self.ensure_destination_free(&dest)?;
        let envelope = Envelope::decode(&data, self.options.format)?;

        stage("unseal", Stage::Deriving, path);
        let secret = self.source.secret()?;
        let params = match envelope.header {
            Header::Legacy => self.options.kdf,
            Header::V1 {
                secret_version,
                iterations,
            } => {
                if secret_version != secret.version() {
                    return Err(SealError::SecretVersionMismatch {
                        envelope: secret_version,
                        configured: secret.version(),
                    });
                }
                KdfParams { iterations }
            }
        };
        let key = derive_key(secret.as_bytes(), &envelope.salt, &params)?;

        stage("unseal", Stage::Transforming, path);
        let associated_data = envelope.header.associated_data();
        let plaintext = crypto::open(
            &key,
            &envelope.nonce,
            &envelope.ciphertext,
            associated_data.as_deref(),
        )?;

        stage("unseal", Stage::Writing, &dest);
        write_atomic(&dest, &plaintext, path, self.options.overwrite)?;

        stage("unseal", Stage::Finalizing, path);
        remove_source(path);

        Ok(dest)
    }

    fn ensure_destination_free(&self, dest: &Path) -> Result<()> {
        if !self.options.overwrite && fs::symlink_metadata(dest).is_ok() {
            return Err(SealError::DestinationExists(dest.to_path_buf()));
        }
        Ok(())
    }
}

/// Append `suffix` to the file name of `path`.
///
/// `report.txt` + `.metal` -> `report.txt.metal`.
pub fn sealed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Strip exactly `suffix` from the file name of `path`.
///
/// Fails with `InvalidExtension` when the name does not end with the
/// suffix or nothing would be left after stripping it.
pub fn unsealed_path(path: &Path, suffix: &str) -> Result<PathBuf> {
    let invalid = || SealError::InvalidExtension {
        path: path.to_path_buf(),
        suffix: suffix.to_string(),
    };

    let name = path.file_name().ok_or_else(invalid)?;
    let stem = strip_name_suffix(name, suffix).ok_or_else(invalid)?;
    Ok(path.with_file_name(stem))
}

/// File names are raw bytes on unix; compare there so non-UTF-8 names
/// unseal as well as they seal.
#[cfg(unix)]
fn strip_name_suffix(name: &OsStr, suffix: &str) -> Option<OsString> {
    use std::os::unix::ffi::OsStrExt;

    let stem = name.as_bytes().strip_suffix(suffix.as_bytes())?;
    (!stem.is_empty()).then(|| OsStr::from_bytes(stem).to_os_string())
}

#[cfg(not(unix))]
fn strip_name_suffix(name: &OsStr, suffix: &str) -> Option<OsString> {
    let stem = name.to_str()?.strip_suffix(suffix)?;
    (!stem.is_empty()).then(|| OsString::from(stem))
}

/// A suffix must be non-empty and must not contain a path separator.
pub fn validate_suffix(suffix: &str) -> Result<()> {
    if suffix.is_empty() {
        return Err(SealError::ConfigError("suffix cannot be empty".into()));
    }
    if suffix.contains('/') || suffix.contains('\\') {
        return Err(SealError::ConfigError(format!(
            "suffix '{suffix}' cannot contain a path separator"
        )));
    }
    Ok(())
}

fn stage(op: &'static str, stage: Stage, path: &Path) {
    debug!(op, stage = %stage, path = %path.display());
}

fn read_source(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(SealError::SourceNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove the consumed source once the destination is durable.
///
/// A failure here is only logged: the operation already succeeded and
/// the caller gets the destination path back.
fn remove_source(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "destination written but source could not be removed");
            false
        }
    }
}
