use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while sealing or unsealing a file.
#[derive(Debug, Error)]
pub enum SealError {
    // --- Secret errors ---
    #[error("Secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error(
        "Secret version mismatch — envelope was sealed with constant set v{envelope}, configured set is v{configured}"
    )]
    SecretVersionMismatch { envelope: u8, configured: u8 },

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — wrong secret or corrupted data")]
    AuthenticationFailure,

    // --- Envelope errors ---
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    // --- File errors ---
    #[error("Source file not found at {0}")]
    SourceNotFound(PathBuf),

    #[error("{path} does not carry the '{suffix}' suffix")]
    InvalidExtension { path: PathBuf, suffix: String },

    #[error("Destination already exists at {0} (use --force to overwrite)")]
    DestinationExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for metalseal results.
pub type Result<T> = std::result::Result<T, SealError>;
