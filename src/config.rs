use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::Provider;
use crate::core::locale::is_valid_locale;
use crate::core::sync::{DEFAULT_BATCH_SIZE, DEFAULT_RETRIES};

pub const CONFIG_FILE_NAME: &str = ".synclangrc.json";

/// Largest accepted `retries` value.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_main_locale")]
    pub main_locale: String,
    /// Target locales to create when missing on disk.
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default)]
    pub do_not_translate: Vec<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default)]
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_source_dir() -> String {
    "./locales".to_string()
}

fn default_main_locale() -> String {
    "en".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            main_locale: default_main_locale(),
            locales: Vec::new(),
            do_not_translate: Vec::new(),
            batch_size: default_batch_size(),
            retries: default_retries(),
            provider: Provider::default(),
            model: None,
            base_url: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for malformed locale codes or a zero batch size.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_locale(&self.main_locale) {
            bail!("Invalid locale code in 'mainLocale': \"{}\"", self.main_locale);
        }

        for locale in &self.locales {
            if !is_valid_locale(locale) {
                bail!("Invalid locale code in 'locales': \"{}\"", locale);
            }
        }

        if self.batch_size == 0 {
            bail!("'batchSize' must be at least 1");
        }

        if self.retries > MAX_RETRIES {
            bail!("'retries' must be at most {}", MAX_RETRIES);
        }

        Ok(())
    }
}

/// Pretty-printed default config, as written by `synclang init`.
pub fn default_config_json() -> Result<String> {
    let mut json = serde_json::to_string_pretty(&Config::default())
        .context("Failed to serialize the default config")?;
    json.push('\n');
    Ok(json)
}

/// Walk up from `start_dir` looking for the config file.
///
/// The search stops at the first directory containing `.git`, so a config
/// from an enclosing project is never picked up.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config came from, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    let Some(path) = find_config_file(start_dir) else {
        debug!("no {} found, using defaults", CONFIG_FILE_NAME);
        return Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        });
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;
    debug!(path = %path.display(), "loaded config");

    Ok(ConfigLoadResult {
        config,
        path: Some(path),
    })
}
