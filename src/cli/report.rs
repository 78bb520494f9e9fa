//! Report formatting and printing utilities.
//!
//! Kept apart from the engine so synclang can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary};
use crate::core::{FilePlan, SyncPlan, SyncSummary};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Maximum number of keys listed per line before eliding.
const MAX_KEYS_DISPLAY: usize = 10;

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Sync(summary) => print_sync_summary_to(summary, writer),
        CommandSummary::Diff(plan) => print_plan_to(plan, writer),
        CommandSummary::Init(summary) => print_init_to(summary, writer),
    }
}

fn counts(summary: &SyncSummary) -> String {
    format!(
        "{} modified, {} deleted, {} added",
        summary.keys_modified, summary.keys_deleted, summary.keys_added
    )
}

/// `✓ Synced: 2 modified, 1 deleted, 3 added (4 files written)`
pub fn print_sync_summary_to<W: Write>(summary: &SyncSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Synced: {} ({} {} written)",
            counts(summary),
            summary.files_written,
            if summary.files_written == 1 { "file" } else { "files" }
        )
        .green()
    );
}

fn key_list(keys: &[String]) -> String {
    if keys.len() <= MAX_KEYS_DISPLAY {
        return keys.join(", ");
    }
    format!(
        "{}, ... and {} more",
        keys[..MAX_KEYS_DISPLAY].join(", "),
        keys.len() - MAX_KEYS_DISPLAY
    )
}

fn print_file_plan_to<W: Write>(plan: &SyncPlan, file: &FilePlan, writer: &mut W) {
    let name = plan.layout.display_name(&plan.main_locale, &file.resource);
    let _ = writeln!(writer, "{}", name.bold());

    let rows: [(&str, colored::ColoredString, &[String]); 3] = [
        ("+", "added".green(), file.changes.added.as_slice()),
        ("~", "modified".yellow(), file.changes.replaced.as_slice()),
        ("-", "deleted".red(), file.changes.deleted.as_slice()),
    ];
    for (mark, label, keys) in rows {
        if !keys.is_empty() {
            let _ = writeln!(writer, "  {} {}: {}", mark, label, key_list(keys));
        }
    }

    if !file.common_missing.is_empty() {
        let _ = writeln!(
            writer,
            "  ? {}: {}",
            "missing in all locales".cyan(),
            key_list(&file.common_missing)
        );
    }
    for (locale, keys) in &file.locale_missing {
        let _ = writeln!(
            writer,
            "  ? {}: {}",
            format!("missing in {}", locale).cyan(),
            key_list(keys)
        );
    }
}

pub fn print_plan_to<W: Write>(plan: &SyncPlan, writer: &mut W) {
    let pending: Vec<&FilePlan> = plan.files.iter().filter(|f| !f.is_noop()).collect();

    if pending.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "All locales are in sync with '{}' ({} layout)",
                plan.main_locale,
                plan.layout.as_str()
            )
            .green()
        );
        return;
    }

    for file in pending {
        print_file_plan_to(plan, file, writer);
    }
    let _ = writeln!(writer);
    let _ = writeln!(
        writer,
        "{} {} across {}",
        "pending:".bold().yellow(),
        counts(&plan.summary()),
        if plan.targets.is_empty() {
            "no target locales".to_string()
        } else {
            plan.targets.join(", ")
        }
    );
}

pub fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", summary.path.display()).green()
    );
}
