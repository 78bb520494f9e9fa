use std::path::Path;

use anyhow::{Context, Result, bail};

use super::super::args::CommonArgs;
use crate::config::{Config, ConfigLoadResult, load_config};
use crate::core::{SyncOptions, locale::is_valid_locale};

/// Merge the config file found from `cwd` with command-line overrides.
///
/// A `sourceDir` from the config file is relative to the file's directory;
/// `--source-dir` is relative to `cwd`.
pub fn resolve_options(
    cwd: &Path,
    common: &CommonArgs,
    batch_size: Option<usize>,
    quiet: bool,
) -> Result<(SyncOptions, Config)> {
    let ConfigLoadResult { config, path } = load_config(cwd)?;
    let base = path.as_deref().and_then(Path::parent).unwrap_or(cwd);

    let source_dir = match &common.source_dir {
        Some(dir) => cwd.join(dir),
        None => base.join(&config.source_dir),
    };

    let main_locale = common
        .main_locale
        .clone()
        .unwrap_or_else(|| config.main_locale.clone());
    if !is_valid_locale(&main_locale) {
        bail!("Invalid main locale: \"{}\"", main_locale);
    }

    let batch_size = batch_size.unwrap_or(config.batch_size);
    if batch_size == 0 {
        bail!("Batch size must be at least 1");
    }

    let options = SyncOptions {
        extra_locales: config.locales.clone(),
        do_not_translate: config.do_not_translate.clone(),
        batch_size,
        retries: config.retries,
        force: common.force,
        quiet,
        ..SyncOptions::new(source_dir, main_locale)
    };
    Ok((options, config))
}

pub fn current_dir() -> Result<std::path::PathBuf> {
    std::env::current_dir().context("Failed to read the current directory")
}
