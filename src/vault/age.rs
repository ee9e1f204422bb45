//! How long has a sealed file been at rest?
//!
//! Sealed files are meant to be opened again eventually; one that sits
//! untouched past `max_age_days` is reported as stale so an operator can
//! rotate or discard it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::errors::{Result, SealError};

/// Age of one file relative to a threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeReport {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    /// Whole days since `modified`.
    pub age_days: i64,
    /// `age_days > max_age_days`.
    pub stale: bool,
}

/// Check `path` against `max_age_days` using the current time.
pub fn check_age(path: &Path, max_age_days: i64) -> Result<AgeReport> {
    check_age_at(path, max_age_days, Utc::now())
}

/// Same as `check_age` with an explicit "now".
pub fn check_age_at(path: &Path, max_age_days: i64, now: DateTime<Utc>) -> Result<AgeReport> {
    let metadata = fs::metadata(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            SealError::SourceNotFound(path.to_path_buf())
        } else {
            SealError::Io(e)
        }
    })?;
    let modified: DateTime<Utc> = metadata.modified()?.into();
    let age_days = now.signed_duration_since(modified).num_days();

    Ok(AgeReport {
        path: path.to_path_buf(),
        modified,
        age_days,
        stale: age_days > max_age_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn fresh_file_is_not_stale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fresh.metal");
        fs::write(&path, b"x").unwrap();

        let report = check_age(&path, 30).unwrap();
        assert_eq!(report.age_days, 0);
        assert!(!report.stale);
    }

    #[test]
    fn old_file_is_stale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("old.metal");
        fs::write(&path, b"x").unwrap();

        let later = Utc::now() + Duration::days(45);
        let report = check_age_at(&path, 30, later).unwrap();
        assert!(report.age_days >= 44);
        assert!(report.stale);
    }

    #[test]
    fn threshold_is_exclusive() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("edge.metal");
        fs::write(&path, b"x").unwrap();
        let modified: DateTime<Utc> = fs::metadata(&path).unwrap().modified().unwrap().into();

        let report = check_age_at(&path, 30, modified + Duration::days(30)).unwrap();
        assert_eq!(report.age_days, 30);
        assert!(!report.stale);
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = check_age(&tmp.path().join("gone.metal"), 30);
        assert!(matches!(result, Err(SealError::SourceNotFound(_))));
    }
}
