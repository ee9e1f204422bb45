//! `metalseal unseal` — verify and decrypt envelopes.
//!
//! A file that fails verification is left exactly as it was and no
//! plaintext is written for it.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `unseal` command.
pub fn execute(cli: &Cli, paths: &[PathBuf], force: bool) -> Result<()> {
    let vault = open_vault(cli, force)?;

    for path in paths {
        let restored = vault.unseal(path)?;
        output::success(&format!(
            "Unsealed {} -> {}",
            path.display(),
            restored.display()
        ));
    }

    Ok(())
}
