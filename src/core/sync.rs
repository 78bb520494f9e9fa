//! End-to-end synchronization run.
//!
//! 1. Load every locale and compute, per main resource file, the change-set
//!    and the keys each locale is missing ([`plan_sync`]).
//! 2. For each file in turn: propagate deletions, translate changed and
//!    common-missing keys for all locales at once, then translate each
//!    locale's own gaps separately.
//! 3. Write every touched locale file in the main file's key order.
//!
//! Everything is sequential; a failed translation ends the run before any
//! file is written.

use std::{collections::HashSet, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::{
    changes::{ChangeSet, extract},
    locale::{Layout, LocaleSet, load_locales},
    missing::find_missing,
    progress::Progress,
    snapshot::SnapshotProvider,
    translate::{TranslationBackend, Translator, apply_deletions},
    writer::write_locale_file,
};

pub const DEFAULT_BATCH_SIZE: usize = 25;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub source_dir: PathBuf,
    pub main_locale: String,
    /// Target locales to create when they do not exist yet.
    pub extra_locales: Vec<String>,
    /// Literal terms the backend must leave untranslated.
    pub do_not_translate: Vec<String>,
    pub batch_size: usize,
    /// Extra attempts per batch after a failure.
    pub retries: u32,
    pub retry_delay: Duration,
    /// Re-translate every key instead of diffing against history.
    pub force: bool,
    pub quiet: bool,
}

impl SyncOptions {
    pub fn new(source_dir: impl Into<PathBuf>, main_locale: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            main_locale: main_locale.into(),
            extra_locales: Vec::new(),
            do_not_translate: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            force: false,
            quiet: false,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub keys_modified: usize,
    pub keys_deleted: usize,
    pub keys_added: usize,
    pub files_written: usize,
}

/// What a run will do for one main resource file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePlan {
    pub resource: String,
    pub changes: ChangeSet,
    /// Keys missing from every target locale.
    pub common_missing: Vec<String>,
    /// Remaining gaps per locale, translated one locale at a time.
    pub locale_missing: IndexMap<String, Vec<String>>,
}

impl FilePlan {
    /// Keys translated for every target locale in one pass.
    pub fn shared_keys(&self) -> Vec<String> {
        let mut keys: IndexSet<String> = self.changes.changed().into_iter().collect();
        keys.extend(self.common_missing.iter().cloned());
        keys.into_iter().collect()
    }

    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.common_missing.is_empty() && self.locale_missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub layout: Layout,
    pub main_locale: String,
    pub targets: Vec<String>,
    pub files: Vec<FilePlan>,
}

impl SyncPlan {
    pub fn summary(&self) -> SyncSummary {
        self.files.iter().fold(SyncSummary::default(), |mut sum, file| {
            sum.keys_modified += file.changes.replaced.len();
            sum.keys_deleted += file.changes.deleted.len();
            sum.keys_added += file.changes.added.len();
            sum
        })
    }
}

fn load_working_set(options: &SyncOptions) -> Result<LocaleSet> {
    let mut set = load_locales(&options.source_dir, &options.main_locale)?;
    for locale in &options.extra_locales {
        set.ensure_locale(locale)?;
    }
    Ok(set)
}

/// Load the locales and work out what a run would translate, without calling
/// a backend or writing anything.
pub fn plan_sync(
    options: &SyncOptions,
    snapshots: &dyn SnapshotProvider,
) -> Result<(LocaleSet, SyncPlan)> {
    let set = load_working_set(options)?;
    let main = set.main().context("Main locale is not loaded")?;
    let targets = set.targets();
    let missing = find_missing(main, &set.locales);

    let mut files = Vec::new();
    for (resource, current) in &main.files {
        let path = set.resource_path(&set.main_locale, resource);
        let changes = extract(&path, current, snapshots, options.force);
        let changed = changes.changed();
        let common_missing = missing.common(resource, &targets);

        let exclude: HashSet<&str> = changed
            .iter()
            .chain(&common_missing)
            .map(String::as_str)
            .collect();
        let locale_missing: IndexMap<String, Vec<String>> = targets
            .iter()
            .map(|locale| (locale.clone(), missing.locale_specific(locale, resource, &exclude)))
            .filter(|(_, keys)| !keys.is_empty())
            .collect();

        files.push(FilePlan {
            resource: resource.clone(),
            changes,
            common_missing,
            locale_missing,
        });
    }

    let plan = SyncPlan {
        layout: set.layout,
        main_locale: set.main_locale.clone(),
        targets,
        files,
    };
    Ok((set, plan))
}

/// Run a full synchronization and return the summary counts.
pub async fn run_sync(
    options: &SyncOptions,
    backend: &dyn TranslationBackend,
    snapshots: &dyn SnapshotProvider,
) -> Result<SyncSummary> {
    let (mut set, plan) = plan_sync(options, snapshots)?;
    let progress = Progress::new(options.quiet);
    let translator = Translator::new(backend, options, progress);
    let mut summary = plan.summary();

    debug!(
        layout = plan.layout.as_str(),
        targets = %plan.targets.join(","),
        files = plan.files.len(),
        "starting sync"
    );

    let mut touched: IndexSet<(String, String)> = IndexSet::new();

    for file in &plan.files {
        let resource = file.resource.as_str();
        let deleted = &file.changes.deleted;

        let name = plan.layout.display_name(&plan.main_locale, resource);

        if !deleted.is_empty() {
            let removed = apply_deletions(&mut set, resource, deleted);
            progress.deleted(&name, removed.values().sum());
            for locale in removed.into_keys() {
                touched.insert((locale, resource.to_string()));
            }
        }

        let shared = file.shared_keys();
        if !shared.is_empty() && !plan.targets.is_empty() {
            translator
                .translate_file(&mut set, resource, &shared, &plan.targets, deleted)
                .await?;
            for locale in &plan.targets {
                touched.insert((locale.clone(), resource.to_string()));
            }
        }

        for (locale, keys) in &file.locale_missing {
            translator
                .translate_file(&mut set, resource, keys, std::slice::from_ref(locale), deleted)
                .await?;
            touched.insert((locale.clone(), resource.to_string()));
        }
    }

    let main = set.main().context("Main locale is not loaded")?;
    for (locale, resource) in &touched {
        let Some(main_map) = main.file(resource) else {
            continue;
        };
        let locale_map = set
            .get(locale)
            .and_then(|info| info.file(resource))
            .cloned()
            .unwrap_or_default();
        let path = set.resource_path(locale, resource);
        write_locale_file(&path, main_map, &locale_map)?;
        progress.wrote(&path);
        summary.files_written += 1;
    }

    Ok(summary)
}
