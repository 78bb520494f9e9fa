//! Batched translation calls and merging of their results.
//!
//! Batches run strictly one after another: deletions are re-applied before
//! every call and each reply is merged before the next request is built.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    flatten::{FlatMap, flatten},
    locale::LocaleSet,
    progress::Progress,
    sync::SyncOptions,
};

/// Translated values: locale → key → text.
pub type Translations = IndexMap<String, FlatMap>;

/// Text-to-text translation service.
///
/// Receives the instruction, the JSON payload of keys to translate and the
/// target locale codes, and returns the raw reply, which must be a JSON object
/// keyed by locale code.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, prompt: &str, payload: &str, targets: &[String]) -> Result<String>;
}

/// Build the translation instruction for one batch.
pub fn build_prompt(main_locale: &str, targets: &[String], do_not_translate: &[String]) -> String {
    let targets: Vec<&str> = targets
        .iter()
        .map(String::as_str)
        .filter(|locale| *locale != main_locale)
        .collect();

    let mut prompt = format!(
        "You are translating the string values of a software project's \"{}\" locale files.\n\
         Translate every value of the JSON object you receive into each of these locales: {}.\n",
        main_locale,
        targets.join(", ")
    );
    if !do_not_translate.is_empty() {
        prompt.push_str(&format!(
            "Never translate these terms, keep them exactly as written: {}.\n",
            do_not_translate.join(", ")
        ));
    }
    prompt.push_str(
        "Keep placeholders such as {name}, {{count}} and %s, HTML tags and ICU syntax unchanged.\n\
         Reply with a single JSON object and nothing else. Its keys are the locale codes; \
         each value is an object mapping every input key, unchanged, to its translation.",
    );
    prompt
}

/// Split keys into batches of at most `batch_size` (a size of zero means one).
pub fn chunk_keys(keys: &[String], batch_size: usize) -> impl Iterator<Item = &[String]> {
    keys.chunks(batch_size.max(1))
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a backend reply into per-locale translations.
pub fn parse_reply(reply: &str) -> Result<Translations> {
    let value: Value = serde_json::from_str(strip_code_fence(reply))
        .context("Translation reply is not valid JSON")?;
    let Value::Object(locales) = value else {
        bail!("Translation reply must be a JSON object keyed by locale code");
    };

    let mut translations = Translations::new();
    for (locale, entries) in locales {
        let Value::Object(entries) = entries else {
            bail!("Translation reply for '{}' is not a JSON object", locale);
        };
        let mut flat = FlatMap::new();
        for (key, value) in entries {
            match value {
                Value::Null => {}
                Value::String(text) => {
                    flat.insert(key, text);
                }
                // Nested reply for a flat key: the key is already a path, so
                // only the nested part is flattened.
                nested @ (Value::Object(_) | Value::Array(_)) => {
                    for (sub_key, text) in flatten(&nested) {
                        flat.insert(format!("{}.{}", key, sub_key), text);
                    }
                }
                other => {
                    flat.insert(key, other.to_string());
                }
            }
        }
        translations.insert(locale, flat);
    }
    Ok(translations)
}

/// Upper bound for a single wait between attempts.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Wait before retry number `attempt + 1`: `base * 2^attempt`, capped at
/// [`MAX_RETRY_DELAY`].
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY)
}

/// Translate one key/value subset into `targets`, retrying failed attempts.
///
/// Both backend errors and unparsable replies count as failures. Once the
/// retries are exhausted the last error is returned.
pub async fn translate_batch(
    backend: &dyn TranslationBackend,
    options: &SyncOptions,
    targets: &[String],
    subset: &FlatMap,
) -> Result<Translations> {
    let payload = serde_json::to_string_pretty(subset).context("Failed to serialize batch")?;
    let prompt = build_prompt(&options.main_locale, targets, &options.do_not_translate);

    let mut attempt: u32 = 0;
    loop {
        let result = match backend.translate(&prompt, &payload, targets).await {
            Ok(reply) => parse_reply(&reply),
            Err(e) => Err(e),
        };
        match result {
            Ok(translations) => {
                for locale in targets {
                    let reply = translations.get(locale);
                    let absent = subset
                        .keys()
                        .filter(|key| reply.is_none_or(|flat| !flat.contains_key(*key)))
                        .count();
                    if absent > 0 {
                        warn!(locale = %locale, absent, "reply is missing requested keys");
                    }
                }
                return Ok(translations);
            }
            Err(e) if attempt < options.retries => {
                let delay = backoff_delay(options.retry_delay, attempt);
                warn!(attempt = attempt + 1, error = %e, delay_ms = delay.as_millis() as u64, "translation batch failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!(
                    "Translation batch failed after {} attempt(s)",
                    attempt + 1
                )));
            }
        }
    }
}

/// Remove `deleted` keys from every non-main locale's copy of `resource`.
///
/// Returns the number of keys removed per locale; locales that had none of
/// the keys are left out.
pub fn apply_deletions(
    set: &mut LocaleSet,
    resource: &str,
    deleted: &[String],
) -> IndexMap<String, usize> {
    let main_locale = set.main_locale.clone();
    let mut removed = IndexMap::new();
    for info in set.locales.iter_mut().filter(|i| i.locale != main_locale) {
        let Some(flat) = info.files.get_mut(resource) else {
            continue;
        };
        let count = deleted
            .iter()
            .filter(|key| flat.shift_remove(key.as_str()).is_some())
            .count();
        if count > 0 {
            removed.insert(info.locale.clone(), count);
        }
    }
    removed
}

/// Copy translated values into the working set. Locales that are not part of
/// the run, and the main locale, are ignored.
pub fn merge_translations(set: &mut LocaleSet, resource: &str, translations: Translations) -> usize {
    let mut merged = 0;
    for (locale, entries) in translations {
        if locale == set.main_locale {
            continue;
        }
        let Some(info) = set.get_mut(&locale) else {
            debug!(locale = %locale, "ignoring translations for unknown locale");
            continue;
        };
        let target = info.file_mut(resource);
        for (key, value) in entries {
            target.insert(key, value);
            merged += 1;
        }
    }
    merged
}

/// Runs the batches of one resource file against the working set.
pub struct Translator<'a> {
    backend: &'a dyn TranslationBackend,
    options: &'a SyncOptions,
    progress: Progress,
}

impl<'a> Translator<'a> {
    pub fn new(backend: &'a dyn TranslationBackend, options: &'a SyncOptions, progress: Progress) -> Self {
        Self {
            backend,
            options,
            progress,
        }
    }

    /// Translate `keys` of `resource` into `targets`, batch by batch.
    ///
    /// Source values come from the main locale. Returns the number of values
    /// merged into the working set.
    pub async fn translate_file(
        &self,
        set: &mut LocaleSet,
        resource: &str,
        keys: &[String],
        targets: &[String],
        deleted: &[String],
    ) -> Result<usize> {
        let source = set
            .main()
            .and_then(|main| main.file(resource))
            .cloned()
            .unwrap_or_default();
        let keys: Vec<String> = keys
            .iter()
            .filter(|key| source.contains_key(*key))
            .cloned()
            .collect();

        let name = set.layout.display_name(&set.main_locale, resource);
        let total = keys.len();
        let mut done = 0;
        let mut merged = 0;

        for batch in chunk_keys(&keys, self.options.batch_size) {
            apply_deletions(set, resource, deleted);

            let subset: FlatMap = batch
                .iter()
                .filter_map(|key| source.get(key).map(|value| (key.clone(), value.clone())))
                .collect();

            let translations = translate_batch(self.backend, self.options, targets, &subset)
                .await
                .with_context(|| format!("Failed to translate {}", name))?;
            merged += merge_translations(set, resource, translations);

            done += batch.len();
            self.progress.batch(&name, done, total, targets);
        }

        Ok(merged)
    }
}
