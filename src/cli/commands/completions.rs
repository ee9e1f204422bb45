//! `metalseal completions <shell>` — print a completion script to stdout.
//!
//! Redirect it wherever the shell picks completions up, for example
//! `metalseal completions bash > ~/.local/share/bash-completion/completions/metalseal`.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
///
/// Unknown shell names never get here: clap rejects them while parsing.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, &mut io::stdout());
    Ok(())
}
