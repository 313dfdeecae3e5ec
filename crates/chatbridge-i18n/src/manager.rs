//! Localisation manager

use crate::bundle::LocaleBundle;
use crate::error::{I18nError, I18nResult};
use crate::locale::DEFAULT_LOCALE;
use crate::resource::discover;
use fluent_bundle::FluentArgs;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Translations keyed by Discord locale code.
pub type LocalizationMap = BTreeMap<String, String>;

/// All loaded translations.
#[derive(Debug, Default)]
pub struct I18n {
    bundles: BTreeMap<String, LocaleBundle>,
}

impl I18n {
    /// Loads every locale found in `dir`.
    ///
    /// Fails when the default locale is absent, since it backs every lookup.
    pub fn load_dir(dir: impl AsRef<Path>) -> I18nResult<Self> {
        let dir = dir.as_ref();
        let sources = discover(dir)?;
        let i18n = Self::from_sources(sources.into_iter().map(|source| (source.code, source.text)))?;

        if !i18n.has_locale(DEFAULT_LOCALE) {
            return Err(I18nError::MissingDefaultLocale {
                locale: DEFAULT_LOCALE,
                dir: dir.display().to_string(),
            });
        }

        info!(
            tag = "setup",
            "Loaded {} locales: {}",
            i18n.bundles.len(),
            i18n.loaded_locales().join(", ")
        );
        Ok(i18n)
    }

    /// Builds the manager from in-memory `(locale, source)` pairs.
    /// Several sources for the same locale are merged.
    pub fn from_sources<I, C, S>(sources: I) -> I18nResult<Self>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: Into<String>,
    {
        let mut bundles: BTreeMap<String, LocaleBundle> = BTreeMap::new();

        for (code, text) in sources {
            let code = code.as_ref();
            if !bundles.contains_key(code) {
                bundles.insert(code.to_string(), LocaleBundle::new(code)?);
            }
            if let Some(bundle) = bundles.get_mut(code) {
                bundle.add_source(text.into())?;
            }
        }

        Ok(Self { bundles })
    }

    /// The default and fallback locale.
    pub const fn default_locale(&self) -> &'static str {
        DEFAULT_LOCALE
    }

    /// Codes of every loaded locale, sorted.
    pub fn loaded_locales(&self) -> Vec<&str> {
        self.bundles.keys().map(String::as_str).collect()
    }

    /// Whether translations for `code` were loaded.
    pub fn has_locale(&self, code: &str) -> bool {
        self.bundles.contains_key(code)
    }

    /// Whether `key` resolves for `locale`, directly or through the fallback.
    pub fn has_message(&self, key: &str, locale: &str) -> bool {
        self.resolve(key, locale).is_some()
    }

    fn resolve(&self, key: &str, locale: &str) -> Option<&LocaleBundle> {
        self.bundles
            .get(locale)
            .filter(|bundle| bundle.has_message(key))
            .or_else(|| self.bundles.get(DEFAULT_LOCALE).filter(|bundle| bundle.has_message(key)))
    }

    /// Formats `key` for `locale`, falling back to the default locale.
    pub fn try_t(&self, key: &str, locale: &str, args: Option<&FluentArgs>) -> I18nResult<String> {
        self.resolve(key, locale)
            .ok_or_else(|| I18nError::MessageNotFound { key: key.to_string() })?
            .format(key, args)
    }

    /// Formats `key` for `locale`, returning the key itself when no locale
    /// defines it.
    pub fn t(&self, key: &str, locale: &str, args: Option<&FluentArgs>) -> String {
        self.try_t(key, locale, args).unwrap_or_else(|err| {
            warn!(tag = "warn", "Translation for '{key}' unavailable: {err}");
            key.to_string()
        })
    }

    /// Every loaded locale's own translation of `key`. Locales that only
    /// reach `key` through the fallback are left out.
    pub fn localization_map(&self, key: &str) -> LocalizationMap {
        self.bundles
            .iter()
            .filter(|(_, bundle)| bundle.has_message(key))
            .filter_map(|(code, bundle)| bundle.format(key, None).ok().map(|text| (code.clone(), text)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluent_args;

    fn i18n() -> I18n {
        I18n::from_sources([
            ("en-US", "hello = Hello\nname = help\nonly-en = English only"),
            ("de", "hello = Hallo\nname = hilfe"),
        ])
        .unwrap()
    }

    #[test]
    fn test_requested_locale_wins() {
        assert_eq!(i18n().t("hello", "de", None), "Hallo");
    }

    #[test]
    fn test_falls_back_to_default() {
        let i18n = i18n();
        assert_eq!(i18n.t("only-en", "de", None), "English only");
        assert_eq!(i18n.t("hello", "ja", None), "Hello");
    }

    #[test]
    fn test_unknown_key_returns_key() {
        assert_eq!(i18n().t("missing-key", "de", None), "missing-key");
        assert!(!i18n().has_message("missing-key", "en-US"));
    }

    #[test]
    fn test_localization_map_skips_fallbacks() {
        let i18n = i18n();
        let map = i18n.localization_map("name");
        assert_eq!(map.get("en-US").map(String::as_str), Some("help"));
        assert_eq!(map.get("de").map(String::as_str), Some("hilfe"));

        let only = i18n.localization_map("only-en");
        assert_eq!(only.len(), 1);
        assert!(i18n.localization_map("missing").is_empty());
    }

    #[test]
    fn test_sources_for_one_locale_are_merged() {
        let i18n = I18n::from_sources([("en-US", "a = 1"), ("en-US", "b = 2")]).unwrap();
        assert_eq!(i18n.loaded_locales(), ["en-US"]);
        assert_eq!(i18n.t("b", "en-US", None), "2");
    }

    #[test]
    fn test_args_macro() {
        let i18n = I18n::from_sources([("en-US", "n = { $count } left")]).unwrap();
        let args = fluent_args!("count" => 3);
        assert_eq!(i18n.t("n", "en-US", args.as_ref()), "3 left");
    }
}
