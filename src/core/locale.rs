//! Locale discovery for the two supported on-disk layouts.
//!
//! - Subfolders: `<root>/<locale>/<resource>.json`, one or more resources per locale.
//! - Flat: `<root>/<locale>.json`, exactly one resource per locale.
//!
//! Layout is detected by probing for locale-named subdirectories first and
//! falling back to locale-named JSON files.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use super::flatten::{FlatMap, read_flat_file};

/// Resource name used for every locale in the flat layout.
pub const FLAT_RESOURCE: &str = "<locale>.json";

static LOCALE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}(-[A-Z][a-z]{3})?(-[A-Z]{2})?$").unwrap());

/// Checks a locale code such as `en`, `en-US`, `zh-Hans` or `zh-Hans-CN`.
pub fn is_valid_locale(code: &str) -> bool {
    LOCALE_CODE_REGEX.is_match(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Subfolders,
    Flat,
}

impl Layout {
    pub fn resource_path(self, root: &Path, locale: &str, resource: &str) -> PathBuf {
        match self {
            Layout::Subfolders => root.join(locale).join(resource),
            Layout::Flat => root.join(format!("{}.json", locale)),
        }
    }

    /// File name to show users for `resource`. In the flat layout the shared
    /// resource name is a placeholder, so the main locale's file is named.
    pub fn display_name(self, main_locale: &str, resource: &str) -> String {
        match self {
            Layout::Subfolders => resource.to_string(),
            Layout::Flat => format!("{}.json", main_locale),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Subfolders => "subfolders",
            Layout::Flat => "flat",
        }
    }
}

/// One locale and its flattened resource files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleInfo {
    pub locale: String,
    pub files: IndexMap<String, FlatMap>,
}

impl LocaleInfo {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            files: IndexMap::new(),
        }
    }

    pub fn file(&self, resource: &str) -> Option<&FlatMap> {
        self.files.get(resource)
    }

    /// Mutable access to a resource map, creating it when absent.
    pub fn file_mut(&mut self, resource: &str) -> &mut FlatMap {
        self.files.entry(resource.to_string()).or_default()
    }
}

/// All locales found under a source directory.
///
/// Locales are kept in discovery order; the main locale is always looked up
/// by its code.
#[derive(Debug, Clone)]
pub struct LocaleSet {
    pub root: PathBuf,
    pub layout: Layout,
    pub main_locale: String,
    pub locales: Vec<LocaleInfo>,
}

impl LocaleSet {
    pub fn main(&self) -> Option<&LocaleInfo> {
        self.get(&self.main_locale)
    }

    pub fn get(&self, locale: &str) -> Option<&LocaleInfo> {
        self.locales.iter().find(|info| info.locale == locale)
    }

    pub fn get_mut(&mut self, locale: &str) -> Option<&mut LocaleInfo> {
        self.locales.iter_mut().find(|info| info.locale == locale)
    }

    /// Codes of every locale except the main one, in discovery order.
    pub fn targets(&self) -> Vec<String> {
        self.locales
            .iter()
            .filter(|info| info.locale != self.main_locale)
            .map(|info| info.locale.clone())
            .collect()
    }

    /// Resource names of the main locale, in load order.
    pub fn resources(&self) -> Vec<String> {
        self.main()
            .map(|main| main.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn resource_path(&self, locale: &str, resource: &str) -> PathBuf {
        self.layout.resource_path(&self.root, locale, resource)
    }

    /// Add a locale that does not exist on disk yet (or was not discovered),
    /// reading whatever files it already has for the main resources.
    pub fn ensure_locale(&mut self, locale: &str) -> Result<()> {
        if !is_valid_locale(locale) {
            bail!("Invalid locale code: \"{}\"", locale);
        }
        if self.get(locale).is_some() {
            return Ok(());
        }
        let info = self.load_locale(locale, &self.resources())?;
        self.locales.push(info);
        Ok(())
    }

    fn load_locale(&self, locale: &str, resources: &[String]) -> Result<LocaleInfo> {
        let required = locale == self.main_locale;
        let mut info = LocaleInfo::new(locale);
        for resource in resources {
            let path = self.resource_path(locale, resource);
            let flat = read_flat_file(&path, required)?;
            info.files.insert(resource.clone(), flat);
        }
        Ok(info)
    }
}

/// Detect the layout of `root` and return it with the discovered locale codes.
pub fn detect_layout(root: &Path) -> Result<(Layout, Vec<String>)> {
    if !root.exists() {
        bail!(
            "Source directory '{}' does not exist.\n\
             Hint: Check your .synclangrc.json 'sourceDir' setting.",
            root.display()
        );
    }
    if !root.is_dir() {
        bail!("'{}' is not a directory.", root.display());
    }

    let mut locale_dirs = Vec::new();
    let mut invalid_dirs = Vec::new();
    let mut locale_files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Cannot read directory: {}", root.display()))?;
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if entry.file_type().is_dir() {
            if is_valid_locale(name) {
                locale_dirs.push(name.to_string());
            } else {
                invalid_dirs.push(name.to_string());
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some("json")
            && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            && is_valid_locale(stem)
        {
            locale_files.push(stem.to_string());
        }
    }

    if !locale_dirs.is_empty() {
        if !invalid_dirs.is_empty() {
            bail!(
                "Invalid locale folder name(s) in '{}': {}",
                root.display(),
                invalid_dirs.join(", ")
            );
        }
        return Ok((Layout::Subfolders, locale_dirs));
    }

    if !locale_files.is_empty() {
        return Ok((Layout::Flat, locale_files));
    }

    if invalid_dirs.is_empty() {
        bail!(
            "No locale folders or locale files found in '{}'.",
            root.display()
        );
    }
    bail!(
        "No locale folders found in '{}'. Invalid locale folder name(s): {}",
        root.display(),
        invalid_dirs.join(", ")
    );
}

/// List the `*.json` resource files of one locale folder, sorted by name.
fn list_resources(dir: &Path) -> Result<Vec<String>> {
    let mut resources = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Cannot read directory: {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some("json")
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
        {
            resources.push(name.to_string());
        }
    }
    Ok(resources)
}

/// Discover and load every locale under `root`.
///
/// Only the main locale's resource names are loaded for the other locales;
/// their missing files become empty maps.
pub fn load_locales(root: &Path, main_locale: &str) -> Result<LocaleSet> {
    let (layout, codes) = detect_layout(root)?;

    if !codes.iter().any(|code| code == main_locale) {
        bail!(
            "Main locale '{}' was not found in '{}'. Found: {}",
            main_locale,
            root.display(),
            codes.join(", ")
        );
    }

    let resources = match layout {
        Layout::Subfolders => list_resources(&root.join(main_locale))?,
        Layout::Flat => vec![FLAT_RESOURCE.to_string()],
    };

    debug!(
        root = %root.display(),
        layout = layout.as_str(),
        locales = codes.len(),
        resources = resources.len(),
        "discovered locales"
    );

    let mut set = LocaleSet {
        root: root.to_path_buf(),
        layout,
        main_locale: main_locale.to_string(),
        locales: Vec::with_capacity(codes.len()),
    };
    for code in &codes {
        let info = set.load_locale(code, &resources)?;
        set.locales.push(info);
    }
    Ok(set)
}
