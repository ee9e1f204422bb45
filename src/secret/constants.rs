//! The named-constant secret set and its on-disk form.
//!
//! A constant file looks like this (TOML):
//!
//! ```toml
//! version = 1
//!
//! [constants]
//! tau = 6.2831853
//! pi  = 3.1415926
//! phi = 1.6180339
//! e   = 2.7182818
//! ```
//!
//! or the equivalent JSON object when the file ends in `.json`.
//!
//! Joining rule: `tau|pi|phi|e`, each value in shortest round-trip
//! decimal form, UTF-8 encoded.  Changing any value or the order changes
//! every derived key, so bump `version` whenever the set changes.
//!
//! Legacy key files are only interchangeable with the older Python tool
//! when every value has a fractional part and sits between `1e-4` and
//! `1e16`.  Outside that, Python's `str(float)` renders differently:
//! integral values keep a `.0` (`6.0`, here `6`) and small magnitudes
//! switch to exponent form (`1e-07`, here `0.0000001`), so the seed and
//! every key derived from it differ.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Secret, SecretSource};
use crate::errors::{Result, SealError};

/// Separator placed between constant values in the joined secret.
pub const DELIMITER: &str = "|";

/// The four named constants, in joining order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    pub tau: f64,
    pub pi: f64,
    pub phi: f64,
    pub e: f64,
}

/// A versioned constant set: the explicit configuration object the
/// secret is reconstructed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantSet {
    /// Version tag of this set.  Files without one are treated as v1.
    #[serde(default = "default_version")]
    pub version: u8,

    pub constants: Constants,
}

fn default_version() -> u8 {
    1
}

impl ConstantSet {
    /// Build a set from explicit values.
    pub fn new(version: u8, constants: Constants) -> Self {
        Self { version, constants }
    }

    /// Parse a constant file.  JSON when the extension is `.json`,
    /// TOML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SealError::SecretUnavailable(format!(
                "secret file not found at {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SealError::SecretUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let set: ConstantSet = if is_json {
            serde_json::from_str(&contents).map_err(|e| {
                SealError::SecretUnavailable(format!("cannot parse {}: {e}", path.display()))
            })?
        } else {
            toml::from_str(&contents).map_err(|e| {
                SealError::SecretUnavailable(format!("cannot parse {}: {e}", path.display()))
            })?
        };

        Ok(set)
    }

    /// Join the constants with the documented rule.
    ///
    /// Non-finite values are rejected: their textual form is not a
    /// meaningful secret.
    pub fn joined(&self) -> Result<String> {
        let c = &self.constants;
        let values = [("tau", c.tau), ("pi", c.pi), ("phi", c.phi), ("e", c.e)];

        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SealError::SecretUnavailable(format!(
                "constant '{name}' must be a finite number"
            )));
        }

        Ok(values
            .iter()
            .map(|(_, v)| v.to_string())
            .collect::<Vec<_>>()
            .join(DELIMITER))
    }
}

impl SecretSource for ConstantSet {
    fn secret(&self) -> Result<Secret> {
        Secret::new(self.version, self.joined()?.into_bytes())
    }
}

/// A constant set that lives in a pre-provisioned file.
///
/// The file is re-read on every `secret()` call so nothing lingers in
/// memory between operations.
#[derive(Debug, Clone)]
pub struct ConstantsFile {
    path: PathBuf,
}

impl ConstantsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SecretSource for ConstantsFile {
    fn secret(&self) -> Result<Secret> {
        ConstantSet::load(&self.path)?.secret()
    }
}
