//! Per-batch progress lines on stderr.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use tracing::info;

/// Progress reporter. Quiet mode silences the console but tracing events
/// are still emitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Progress {
    quiet: bool,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn batch(&self, resource: &str, done: usize, total: usize, targets: &[String]) {
        info!(resource, done, total, targets = %targets.join(","), "translated batch");
        self.emit(&format_batch(resource, done, total, targets));
    }

    pub fn deleted(&self, resource: &str, count: usize) {
        info!(resource, count, "propagated deletions");
        self.emit(&format!(
            "{} {} key(s) from {}",
            "deleting".red().bold(),
            count,
            resource
        ));
    }

    pub fn wrote(&self, path: &Path) {
        info!(path = %path.display(), "wrote locale file");
        self.emit(&format!("{} {}", "wrote".green().bold(), path.display()));
    }

    fn emit(&self, line: &str) {
        if !self.quiet {
            let _ = writeln!(io::stderr().lock(), "{}", line);
        }
    }
}

/// `translating common.json 25/60 (fr, de)`
pub fn format_batch(resource: &str, done: usize, total: usize, targets: &[String]) -> String {
    format!(
        "{} {} {}/{} ({})",
        "translating".cyan().bold(),
        resource,
        done,
        total,
        targets.join(", ")
    )
}
