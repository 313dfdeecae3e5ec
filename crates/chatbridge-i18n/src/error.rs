//! Error types for localisation

use thiserror::Error;

/// Errors that can occur while loading or formatting translations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// Failed to read a resource file
    #[error("Failed to load resource file {path}: {source}")]
    ResourceLoad {
        /// File that could not be read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A Fluent resource contains syntax errors
    #[error("Failed to parse Fluent resource for {locale}: {errors:?}")]
    FluentParse {
        /// Locale the resource belongs to.
        locale: String,
        /// Parser diagnostics.
        errors: Vec<String>,
    },

    /// Two resources define the same message
    #[error("Conflicting messages in {locale}: {errors:?}")]
    Conflict {
        /// Locale the resource belongs to.
        locale: String,
        /// Bundle diagnostics.
        errors: Vec<String>,
    },

    /// Message not found in any bundle
    #[error("Message not found: {key}")]
    MessageNotFound {
        /// Message identifier.
        key: String,
    },

    /// Failed to format a message
    #[error("Failed to format message '{key}': {errors:?}")]
    MessageFormat {
        /// Message identifier.
        key: String,
        /// Resolver diagnostics.
        errors: Vec<String>,
    },

    /// The default locale has no translations
    #[error("No translations found for the default locale {locale} in {dir}")]
    MissingDefaultLocale {
        /// Default locale code.
        locale: &'static str,
        /// Directory that was scanned.
        dir: String,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for localisation operations
pub type I18nResult<T> = Result<T, I18nError>;
