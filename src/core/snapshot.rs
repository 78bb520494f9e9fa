//! Previous-state lookup for the main locale's resource files.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, trace};

/// Source of the last committed text of a file.
///
/// `None` covers every "no previous version" case: the file was never
/// recorded, the history is unavailable, or the lookup failed.
pub trait SnapshotProvider {
    fn previous(&self, path: &Path) -> Option<String>;
}

/// Reads the `HEAD` version of a file through the git CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitSnapshots;

impl SnapshotProvider for GitSnapshots {
    fn previous(&self, path: &Path) -> Option<String> {
        let dir = path.parent()?;
        let file_name = path.file_name()?.to_str()?;
        let object = format!("HEAD:./{}", file_name);

        trace!(dir = %dir.display(), object = %object, "running git show");

        let output = match Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["show", &object])
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "git unavailable, no previous version");
                return None;
            }
        };

        if output.status.success() {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            debug!(
                path = %path.display(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "no committed version"
            );
            None
        }
    }
}

/// In-memory snapshots keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshots {
    files: HashMap<PathBuf, String>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SnapshotProvider for MemorySnapshots {
    fn previous(&self, path: &Path) -> Option<String> {
        self.files.get(path).cloned()
    }
}
