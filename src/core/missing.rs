//! Which main-locale keys each other locale still lacks.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::{flatten::FlatMap, locale::LocaleInfo};

/// A key counts as missing when the locale has no value for it or the value
/// is empty. An intentionally empty translation is therefore re-translated.
pub fn is_missing(flat: Option<&FlatMap>, key: &str) -> bool {
    flat.and_then(|map| map.get(key))
        .is_none_or(|value| value.is_empty())
}

/// Missing keys per locale, per resource file, in main key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingKeys {
    by_locale: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl MissingKeys {
    pub fn get(&self, locale: &str, resource: &str) -> &[String] {
        self.by_locale
            .get(locale)
            .and_then(|files| files.get(resource))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_locale.is_empty()
    }

    /// Keys missing from every locale in `locales` for `resource`.
    ///
    /// Only meaningful with two or more locales; otherwise empty, and the
    /// single locale's gaps are handled as locale-specific.
    pub fn common(&self, resource: &str, locales: &[String]) -> Vec<String> {
        let Some((first, rest)) = locales.split_first() else {
            return Vec::new();
        };
        if rest.is_empty() {
            return Vec::new();
        }

        let others: Vec<HashSet<&str>> = rest
            .iter()
            .map(|locale| {
                self.get(locale, resource)
                    .iter()
                    .map(String::as_str)
                    .collect()
            })
            .collect();

        self.get(first, resource)
            .iter()
            .filter(|key| others.iter().all(|set| set.contains(key.as_str())))
            .cloned()
            .collect()
    }

    /// Missing keys of one locale that are not already covered by `exclude`.
    pub fn locale_specific(
        &self,
        locale: &str,
        resource: &str,
        exclude: &HashSet<&str>,
    ) -> Vec<String> {
        self.get(locale, resource)
            .iter()
            .filter(|key| !exclude.contains(key.as_str()))
            .cloned()
            .collect()
    }
}

/// Compare every other locale against the main locale's keys.
pub fn find_missing<'a>(
    main: &LocaleInfo,
    others: impl IntoIterator<Item = &'a LocaleInfo>,
) -> MissingKeys {
    let mut missing = MissingKeys::default();

    for info in others {
        if info.locale == main.locale {
            continue;
        }
        for (resource, main_map) in &main.files {
            let target = info.file(resource);
            let keys: Vec<String> = main_map
                .keys()
                .filter(|key| is_missing(target, key))
                .cloned()
                .collect();
            if !keys.is_empty() {
                missing
                    .by_locale
                    .entry(info.locale.clone())
                    .or_default()
                    .insert(resource.clone(), keys);
            }
        }
    }

    missing
}
