use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS};
use crate::errors::{Result, SealError};
use crate::vault::{EnvelopeFormat, SealOptions, DEFAULT_SUFFIX};

/// Project-level configuration, loaded from `.metalseal.toml`.
///
/// Every field except `secret_file` has a sensible default.  The secret
/// file has none on purpose: it must be provisioned explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Suffix appended to sealed files (default: ".metal").
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Path of the constant file the secret is built from.
    /// Relative paths are resolved against the config file's directory.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// PBKDF2 iteration count for new envelopes (default: 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Envelope layout: "v1" (default) or "legacy".
    #[serde(default)]
    pub envelope_format: EnvelopeFormat,

    /// Sealed files older than this are reported as stale by `age`.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_max_age_days() -> i64 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            secret_file: None,
            kdf_iterations: default_kdf_iterations(),
            envelope_format: EnvelopeFormat::default(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".metalseal.toml";

    /// Load settings from `<project_dir>/.metalseal.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load settings from an explicit file, which must exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            SealError::ConfigError(format!("Failed to read {}: {e}", config_path.display()))
        })?;

        let mut settings: Settings = toml::from_str(&contents).map_err(|e| {
            SealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if let Some(secret) = settings.secret_file.take() {
            settings.secret_file = Some(match config_path.parent() {
                Some(base) if secret.is_relative() => base.join(secret),
                _ => secret,
            });
        }

        Ok(settings)
    }

    /// Convert into the options a `Vault` is built with.
    pub fn seal_options(&self, overwrite: bool) -> Result<SealOptions> {
        let options = SealOptions {
            suffix: self.suffix.clone(),
            kdf: KdfParams {
                iterations: self.kdf_iterations,
            },
            format: self.envelope_format,
            overwrite,
        };
        options.validate()?;
        Ok(options)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
