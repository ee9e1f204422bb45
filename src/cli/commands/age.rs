//! `metalseal age` — flag sealed files that have sat too long.

use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{load_settings, Cli};
use crate::errors::Result;
use crate::vault::check_age;

/// Execute the `age` command.
pub fn execute(cli: &Cli, paths: &[PathBuf], max_days: Option<i64>) -> Result<()> {
    let max_age_days = match max_days {
        Some(days) => days,
        None => load_settings(cli)?.max_age_days,
    };

    let reports = paths
        .iter()
        .map(|p| check_age(p, max_age_days))
        .collect::<Result<Vec<_>>>()?;

    output::print_age_table(&reports, max_age_days);
    Ok(())
}
