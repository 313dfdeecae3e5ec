//! Localisation for the chatbridge bot.
//!
//! Translations are Fluent files laid out as `<dir>/<discord-locale>/main.ftl`.
//! Only directories named after a Discord locale code are picked up, and
//! `en-US` is both the default and the fallback locale.
//!
//! # Example
//!
//! ```rust
//! use chatbridge_i18n::{fluent_args, I18n};
//!
//! # fn example() -> Result<(), chatbridge_i18n::I18nError> {
//! let i18n = I18n::from_sources([("en-US", "hello = Hello, { $name }!")])?;
//! let args = fluent_args!("name" => "Steve");
//!
//! assert_eq!(i18n.t("hello", "de", args.as_ref()), "Hello, Steve!");
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod error;
pub mod locale;
pub mod manager;
pub mod resource;

pub use bundle::LocaleBundle;
pub use error::{I18nError, I18nResult};
pub use locale::{is_discord_locale, DEFAULT_LOCALE, DISCORD_LOCALES};
pub use manager::{I18n, LocalizationMap};

pub use fluent_bundle::{FluentArgs, FluentValue};

/// Builds `Option<FluentArgs>` from `key => value` pairs.
#[macro_export]
macro_rules! fluent_args {
    () => {
        None::<$crate::FluentArgs>
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::FluentArgs::new();
        $(
            args.set($key, $value);
        )+
        Some(args)
    }};
}
