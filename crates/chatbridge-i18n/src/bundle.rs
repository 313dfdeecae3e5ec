//! A thread-safe Fluent bundle for one locale.

use crate::error::{I18nError, I18nResult};
use crate::locale::language_identifier;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use tracing::{debug, warn};

/// Translations for a single locale.
pub struct LocaleBundle {
    code: String,
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for LocaleBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleBundle")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

impl LocaleBundle {
    /// Creates an empty bundle for `code`.
    pub fn new(code: &str) -> I18nResult<Self> {
        let mut bundle = FluentBundle::new_concurrent(vec![language_identifier(code)?]);
        // Discord renders the bidi isolation marks literally.
        bundle.set_use_isolating(false);

        Ok(Self {
            code: code.to_string(),
            bundle,
        })
    }

    /// Parses `source` and adds its messages to the bundle.
    pub fn add_source(&mut self, source: String) -> I18nResult<()> {
        let resource = FluentResource::try_new(source).map_err(|(_, errors)| I18nError::FluentParse {
            locale: self.code.clone(),
            errors: errors.iter().map(|e| format!("{e:?}")).collect(),
        })?;

        self.bundle
            .add_resource(resource)
            .map_err(|errors| I18nError::Conflict {
                locale: self.code.clone(),
                errors: errors.iter().map(|e| format!("{e:?}")).collect(),
            })?;

        debug!(tag = "setup", locale = %self.code, "Added Fluent resource");
        Ok(())
    }

    /// Locale code of this bundle.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Whether the bundle defines a message with a value for `key`.
    pub fn has_message(&self, key: &str) -> bool {
        self.bundle
            .get_message(key)
            .is_some_and(|message| message.value().is_some())
    }

    /// Formats `key`, failing when it is missing or resolves with errors.
    pub fn format(&self, key: &str, args: Option<&FluentArgs>) -> I18nResult<String> {
        let pattern = self
            .bundle
            .get_message(key)
            .and_then(|message| message.value())
            .ok_or_else(|| I18nError::MessageNotFound { key: key.to_string() })?;

        let mut errors = Vec::new();
        let formatted = self.bundle.format_pattern(pattern, args, &mut errors);

        if !errors.is_empty() {
            let errors: Vec<String> = errors.iter().map(|e| format!("{e:?}")).collect();
            warn!(tag = "warn", locale = %self.code, "Formatting errors for message '{key}': {errors:?}");
            return Err(I18nError::MessageFormat {
                key: key.to_string(),
                errors,
            });
        }

        Ok(formatted.into_owned())
    }
}
