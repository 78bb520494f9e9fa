//! Key-level change detection for the main locale.

use std::{collections::HashSet, path::Path};

use tracing::{debug, warn};

use super::{
    flatten::{FlatMap, parse_flat},
    snapshot::SnapshotProvider,
};

/// Keys that differ between the previous and current main snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// In current, not in previous. Current order.
    pub added: Vec<String>,
    /// In both with a different value. Previous order.
    pub replaced: Vec<String>,
    /// In previous, not in current. Previous order.
    pub deleted: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.replaced.is_empty() && self.deleted.is_empty()
    }

    /// Keys to send for translation: added first, then replaced, without duplicates.
    pub fn changed(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.added
            .iter()
            .chain(&self.replaced)
            .filter(|key| seen.insert(key.as_str()))
            .cloned()
            .collect()
    }
}

/// Compare two flat snapshots.
pub fn diff(previous: &FlatMap, current: &FlatMap) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (key, old_value) in previous {
        match current.get(key) {
            Some(new_value) if new_value != old_value => changes.replaced.push(key.clone()),
            Some(_) => {}
            None => changes.deleted.push(key.clone()),
        }
    }

    changes.added = current
        .keys()
        .filter(|key| !previous.contains_key(*key))
        .cloned()
        .collect();

    changes
}

/// Treat every current key as replaced, bypassing history.
pub fn force_all(current: &FlatMap) -> ChangeSet {
    ChangeSet {
        replaced: current.keys().cloned().collect(),
        ..Default::default()
    }
}

/// Change-set of the main resource at `path` against its previous snapshot.
///
/// History misses and unreadable snapshots count as "no previous version",
/// so every current key is added.
pub fn extract(
    path: &Path,
    current: &FlatMap,
    snapshots: &dyn SnapshotProvider,
    force: bool,
) -> ChangeSet {
    if force {
        return force_all(current);
    }

    let previous = match snapshots.previous(path) {
        Some(text) => match parse_flat(&text) {
            Ok(flat) => flat,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "previous version is not valid JSON, ignoring it");
                FlatMap::new()
            }
        },
        None => FlatMap::new(),
    };

    let changes = diff(&previous, current);
    debug!(
        path = %path.display(),
        added = changes.added.len(),
        replaced = changes.replaced.len(),
        deleted = changes.deleted.len(),
        "extracted change-set"
    );
    changes
}
