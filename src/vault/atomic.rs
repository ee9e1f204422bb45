//! Crash-safe file replacement.
//!
//! Data is written to a temp file in the destination directory, flushed
//! to disk, then renamed over the target.  Readers never observe a
//! half-written file, and if anything fails before the rename the temp
//! file is removed when it drops.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::errors::{Result, SealError};

/// Atomically write `data` to `dest`.
///
/// The new file takes the permissions of `template` (the file being
/// transformed) when it can be read.  With `overwrite == false` an
/// existing `dest` is left untouched and `DestinationExists` is returned.
pub fn write_atomic(dest: &Path, data: &[u8], template: &Path, overwrite: bool) -> Result<()> {
    // `Path::new("report.txt").parent()` is `Some("")`.
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)?;

    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(template) {
        fs::set_permissions(tmp.path(), meta.permissions())?;
    }

    let persisted = if overwrite {
        tmp.persist(dest)
    } else {
        tmp.persist_noclobber(dest)
    };
    persisted.map_err(|e| {
        if !overwrite && e.error.kind() == io::ErrorKind::AlreadyExists {
            SealError::DestinationExists(dest.to_path_buf())
        } else {
            SealError::Io(e.error)
        }
    })?;

    sync_dir(parent);
    Ok(())
}

/// Flush the directory entry for the rename.  Best effort.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(dir = %dir.display(), error = %e, "directory fsync skipped");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("src");
        fs::write(&template, b"x").unwrap();
        let dest = tmp.path().join("out.bin");

        write_atomic(&dest, b"hello", &template, false).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"hello");
    }

    #[test]
    fn refuses_to_clobber_without_overwrite() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("src");
        fs::write(&template, b"x").unwrap();
        let dest = tmp.path().join("out.bin");
        fs::write(&dest, b"keep me").unwrap();

        let result = write_atomic(&dest, b"new", &template, false);
        assert!(matches!(result, Err(SealError::DestinationExists(_))));
        assert_eq!(fs::read(&dest).unwrap(), b"keep me");
    }

    #[test]
    fn overwrite_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("src");
        fs::write(&template, b"x").unwrap();
        let dest = tmp.path().join("out.bin");
        fs::write(&dest, b"old").unwrap();

        write_atomic(&dest, b"new", &template, true).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("src");
        fs::write(&template, b"x").unwrap();
        let dest = tmp.path().join("out.bin");
        fs::write(&dest, b"old").unwrap();

        let _ = write_atomic(&dest, b"new", &template, false);
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn copies_template_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("src");
        fs::write(&template, b"x").unwrap();
        fs::set_permissions(&template, fs::Permissions::from_mode(0o640)).unwrap();
        let dest = tmp.path().join("out.bin");

        write_atomic(&dest, b"data", &template, false).unwrap();
        let mode = fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
