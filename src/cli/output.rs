//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::crypto::TAG_LEN;
use crate::vault::{AgeReport, Envelope, Header};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the decoded header fields of an envelope.
pub fn print_envelope(path: &Path, envelope: &Envelope) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec!["File".to_string(), path.display().to_string()]);
    table.add_row(vec![
        "Format".to_string(),
        envelope.header.format().to_string(),
    ]);
    match envelope.header {
        Header::Legacy => {
            table.add_row(vec![
                "KDF iterations".to_string(),
                "not recorded (uses configured value)".to_string(),
            ]);
        }
        Header::V1 {
            secret_version,
            iterations,
        } => {
            table.add_row(vec!["Secret version".to_string(), secret_version.to_string()]);
            table.add_row(vec!["KDF iterations".to_string(), iterations.to_string()]);
        }
    }
    table.add_row(vec!["Salt".to_string(), BASE64.encode(envelope.salt)]);
    table.add_row(vec!["Nonce".to_string(), BASE64.encode(envelope.nonce)]);
    table.add_row(vec![
        "Ciphertext + tag".to_string(),
        format!("{} bytes", envelope.ciphertext.len()),
    ]);
    table.add_row(vec![
        "Plaintext".to_string(),
        format!("{} bytes", envelope.ciphertext.len().saturating_sub(TAG_LEN)),
    ]);

    println!("{table}");
}

/// Print a table of sealed-file ages.
pub fn print_age_table(reports: &[AgeReport], max_age_days: i64) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Modified", "Age (days)", "Status"]);

    for r in reports {
        let status = if r.stale {
            style("stale").yellow().to_string()
        } else {
            style("ok").green().to_string()
        };
        table.add_row(vec![
            r.path.display().to_string(),
            r.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.age_days.to_string(),
            status,
        ]);
    }

    println!("{table}");

    let stale = reports.iter().filter(|r| r.stale).count();
    if stale > 0 {
        warning(&format!(
            "{stale} sealed file(s) older than {max_age_days} days"
        ));
        tip("Unseal and re-seal them to refresh salt and nonce, or remove them.");
    }
}
