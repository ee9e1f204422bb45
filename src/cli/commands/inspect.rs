//! `metalseal inspect` — print an envelope's header.

use std::path::Path;

use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::Result;
use crate::vault;

/// Execute the `inspect` command.
pub fn execute(cli: &Cli, path: &Path) -> Result<()> {
    let settings = load_settings(cli)?;
    let envelope = vault::inspect(path, settings.envelope_format)?;
    output::print_envelope(path, &envelope);
    Ok(())
}
