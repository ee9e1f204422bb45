//! `metalseal seal` — encrypt files into envelopes.
//!
//! Each file is written to `<path><suffix>` atomically and the original
//! is removed only once the sealed copy is on disk.  Stops at the first
//! failure; files already sealed stay sealed.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `seal` command.
pub fn execute(cli: &Cli, paths: &[PathBuf], force: bool) -> Result<()> {
    let vault = open_vault(cli, force)?;

    for path in paths {
        let sealed = vault.seal(path)?;
        output::success(&format!(
            "Sealed {} -> {}",
            path.display(),
            sealed.display()
        ));
    }

    Ok(())
}
