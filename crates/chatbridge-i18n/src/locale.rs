//! Discord locale codes.

use crate::error::{I18nError, I18nResult};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use unic_langid::LanguageIdentifier;

/// Default and fallback locale.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Every locale code Discord sends in interactions.
pub const DISCORD_LOCALES: &[&str] = &[
    "id", "da", "de", "en-GB", "en-US", "es-ES", "es-419", "fr", "hr", "it", "lt", "hu", "nl",
    "no", "pl", "pt-BR", "ro", "fi", "sv-SE", "vi", "tr", "cs", "el", "bg", "ru", "uk", "hi",
    "th", "zh-CN", "ja", "zh-TW", "ko",
];

static LOCALE_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| DISCORD_LOCALES.iter().copied().collect());

/// Whether `code` is one of [`DISCORD_LOCALES`].
pub fn is_discord_locale(code: &str) -> bool {
    LOCALE_SET.contains(code)
}

/// Parses a locale code into a Fluent language identifier.
pub fn language_identifier(code: &str) -> I18nResult<LanguageIdentifier> {
    code.parse()
        .map_err(|_| I18nError::InvalidLanguageId(code.to_string()))
}
