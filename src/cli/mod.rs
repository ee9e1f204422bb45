//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::errors::{Result, SealError};
use crate::secret::ConstantsFile;
use crate::vault::Vault;

/// metalseal CLI: seal files into encrypted envelopes and back.
#[derive(Parser)]
#[command(
    name = "metalseal",
    about = "Seal files into authenticated encrypted envelopes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Constant file the secret is built from (.toml or .json)
    #[arg(long, env = "METALSEAL_SECRET_FILE", global = true)]
    pub secret_file: Option<PathBuf>,

    /// Config file (default: ./.metalseal.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt files into <path><suffix> and remove the originals
    Seal {
        /// Files to seal
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Overwrite an existing sealed file
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt sealed files back to their original names
    Unseal {
        /// Sealed files (must end with the configured suffix)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Overwrite an existing plaintext file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the header of a sealed file (no secret needed)
    Inspect {
        /// Sealed file
        path: PathBuf,
    },

    /// Report sealed files that have been at rest too long
    Age {
        /// Sealed files to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Threshold in days (default: max_age_days from config)
        #[arg(long)]
        max_days: Option<i64>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Install the tracing subscriber.
///
/// `--verbose` forces debug output for this crate; otherwise `RUST_LOG`
/// decides, falling back to warnings only.  Everything goes to stderr.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("metalseal=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Load settings from `--config`, or `.metalseal.toml` in the working
/// directory when present.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(&std::env::current_dir()?),
    }
}

/// Resolve the secret file, trying in order:
/// 1. `--secret-file` / `METALSEAL_SECRET_FILE`
/// 2. `secret_file` in the settings file
///
/// There is no fallback location.
pub fn secret_source(cli: &Cli, settings: &Settings) -> Result<ConstantsFile> {
    cli.secret_file
        .clone()
        .or_else(|| settings.secret_file.clone())
        .map(ConstantsFile::new)
        .ok_or_else(|| {
            SealError::SecretUnavailable(
                "no secret file configured — use --secret-file, METALSEAL_SECRET_FILE, or secret_file in .metalseal.toml".into(),
            )
        })
}

/// Build a `Vault` from the CLI arguments and settings.
pub fn open_vault(cli: &Cli, overwrite: bool) -> Result<Vault<ConstantsFile>> {
    let settings = load_settings(cli)?;
    let source = secret_source(cli, &settings)?;
    tracing::debug!(secret_file = %source.path().display(), "using secret file");
    Vault::new(source, settings.seal_options(overwrite)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn secret_flag_wins_over_settings() {
        let cli = Cli::parse_from([
            "metalseal",
            "--secret-file",
            "/flag/constants.toml",
            "seal",
            "a.txt",
        ]);
        let settings = Settings {
            secret_file: Some(PathBuf::from("/config/constants.toml")),
            ..Settings::default()
        };
        let source = secret_source(&cli, &settings).unwrap();
        assert_eq!(source.path(), std::path::Path::new("/flag/constants.toml"));
    }

    #[test]
    fn settings_secret_file_is_used_without_flag() {
        let mut cli = Cli::parse_from(["metalseal", "unseal", "a.txt.metal"]);
        cli.secret_file = None;
        let settings = Settings {
            secret_file: Some(PathBuf::from("/config/constants.toml")),
            ..Settings::default()
        };
        let source = secret_source(&cli, &settings).unwrap();
        assert_eq!(
            source.path(),
            std::path::Path::new("/config/constants.toml")
        );
    }

    #[test]
    fn missing_secret_file_is_secret_unavailable() {
        let mut cli = Cli::parse_from(["metalseal", "seal", "a.txt"]);
        cli.secret_file = None;
        let result = secret_source(&cli, &Settings::default());
        assert!(matches!(result, Err(SealError::SecretUnavailable(_))));
    }

    #[test]
    fn completions_take_a_known_shell() {
        let cli = Cli::parse_from(["metalseal", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["metalseal", "completions", "csh"]).is_err());
    }

    #[test]
    fn seal_requires_a_path() {
        assert!(Cli::try_parse_from(["metalseal", "seal"]).is_err());
    }
}
