//! Writes reconciled locale files back to disk.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::flatten::{FlatMap, unflatten};

/// Rebuild a locale's map in the main file's key order.
///
/// Keys the locale does not have are skipped; keys the main file does not
/// have are dropped.
pub fn reorder(main: &FlatMap, locale: &FlatMap) -> FlatMap {
    main.keys()
        .filter_map(|key| locale.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}

/// Render a flat map as nested JSON with 2-space indentation, a blank line
/// after every `},` line and a trailing newline.
pub fn render(flat: &FlatMap) -> Result<String> {
    let pretty =
        serde_json::to_string_pretty(&unflatten(flat)).context("Failed to serialize JSON")?;

    let mut content = String::with_capacity(pretty.len() + 64);
    for line in pretty.lines() {
        content.push_str(line);
        content.push('\n');
        if line.trim() == "}," {
            content.push('\n');
        }
    }
    Ok(content)
}

/// Write `locale` ordered after `main` to `path`, creating parent directories.
pub fn write_locale_file(path: &Path, main: &FlatMap, locale: &FlatMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = render(&reorder(main, locale))?;
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
