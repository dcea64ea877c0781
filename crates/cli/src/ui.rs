//! User interface functions for the CLI.
//! Contains the banner and the end-of-run summary, both written to stderr.

use colored::*;
use engine::AnalysisSummary;

pub fn print_header() {
    let version = env!("CARGO_PKG_VERSION");
    // Avoid panics when the version exceeds the expected width
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │          S Y M T R E E               │
    │                                      │
    │     Two-pass Java symbol tables      │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}

pub fn print_summary(summary: &AnalysisSummary) {
    let skipped = summary.parser.parse_errors;
    let files = format!(
        "{} files ({} parsed, {} skipped)",
        summary.files, summary.parser.files_parsed, skipped
    );
    let files = if skipped > 0 {
        files.bright_yellow()
    } else {
        files.bright_white()
    };
    eprintln!(
        "{} {} | {} components | {} libraries | {} ms",
        "Analysis complete:".bright_green().bold(),
        files,
        summary.components.to_string().bright_white().bold(),
        summary.libraries,
        summary.elapsed_ms
    );
    if !summary.revision_id.is_empty() {
        eprintln!("Revision: {}", summary.revision_id.dimmed());
    }
}
