//! Environment loading.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every problem is collected before anything is reported, so a single
//! run shows the operator all missing or malformed variables at once.

use crate::error::ConfigError;
use crate::schema::{CommandsConfig, Config, DiscordConfig, I18nConfig, LoggingSettings, MinecraftConfig};
use chatbridge_common::{ChannelId, GuildId, UserId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// The type a required variable must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    /// Any non-empty string.
    String,
    /// `true` or `false`.
    Boolean,
    /// A Discord snowflake.
    Snowflake,
}

impl EnvKind {
    const fn expected(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Boolean => "'true' or 'false'",
            Self::Snowflake => "a Discord snowflake",
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            Self::String => true,
            Self::Boolean => parse_bool(value).is_some(),
            Self::Snowflake => GuildId::from_str(value).is_ok(),
        }
    }
}

/// A required environment variable and the kind of value it holds.
#[derive(Debug, Clone, Copy)]
pub struct EnvSpec {
    /// Variable name.
    pub key: &'static str,
    /// Expected kind.
    pub kind: EnvKind,
}

/// Bot token.
pub const DISCORD_CLIENT_TOKEN: &str = "DISCORD_CLIENT_TOKEN";
/// Development guild.
pub const DEV_DISCORD_GUILD_ID: &str = "DEV_DISCORD_GUILD_ID";
/// Development mode switch.
pub const DEV_MODE: &str = "DEV_MODE";

/// Whether console lines carry the local time.
pub const LOG_TIMESTAMPS: &str = "LOG_TIMESTAMPS";

/// Variables the bot cannot start without.
pub const REQUIRED_ENV: &[EnvSpec] = &[
    EnvSpec {
        key: DISCORD_CLIENT_TOKEN,
        kind: EnvKind::String,
    },
    EnvSpec {
        key: DEV_DISCORD_GUILD_ID,
        kind: EnvKind::Snowflake,
    },
    EnvSpec {
        key: DEV_MODE,
        kind: EnvKind::Boolean,
    },
];

/// Parses `true` / `false`, ignoring case and surrounding whitespace.
pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Loads `.env` from the current directory or its parents into the process
/// environment. A missing file is not an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(tag = "setup", path = %path.display(), "Loaded .env file");
            Ok(Some(path))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Loads `.env` and then reads the full configuration from the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_dotenv()?;
    EnvLoader::from_env().load()
}

/// Builds a [`Config`] from a snapshot of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    vars: HashMap<String, String>,
}

impl EnvLoader {
    /// Snapshot of the process environment.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Uses the given key/value pairs instead of the process environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Reads a `.env` file without touching the process environment.
    pub fn from_dotenv_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let vars = dotenvy::from_path_iter(path.as_ref())?.collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { vars })
    }

    /// Returns the trimmed value of `key`, treating empty values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// Checks every [`REQUIRED_ENV`] entry.
    pub fn check_required(&self) -> Vec<ConfigError> {
        REQUIRED_ENV
            .iter()
            .filter_map(|spec| match self.get(spec.key) {
                None => Some(ConfigError::Missing { key: spec.key }),
                Some(value) if !spec.kind.accepts(value) => Some(ConfigError::Invalid {
                    key: spec.key,
                    expected: spec.kind.expected(),
                    value: value.to_string(),
                }),
                Some(_) => None,
            })
            .collect()
    }

    /// Builds and validates the configuration.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut errors = self.check_required();

        let token = self.get(DISCORD_CLIENT_TOKEN).map(str::to_string);
        let dev_guild_id = self.get(DEV_DISCORD_GUILD_ID).and_then(|v| v.parse::<GuildId>().ok());
        let dev_mode = self.get(DEV_MODE).and_then(parse_bool);

        let command_defaults = CommandsConfig::default();
        let commands = CommandsConfig {
            error_cooldown_seconds: self.optional(
                "COMMAND_ERROR_COOLDOWN_SECONDS",
                command_defaults.error_cooldown_seconds,
                "a whole number of seconds",
                |v| v.parse().ok(),
                &mut errors,
            ),
            log_command_uses: self.optional_bool("LOG_COMMAND_USES", true, &mut errors),
            allow_guild_installed: self.optional_bool("ALLOW_GUILD_INSTALLED_COMMANDS", true, &mut errors),
            allow_user_installed: self.optional_bool("ALLOW_USER_INSTALLED_COMMANDS", true, &mut errors),
            developer_ids: self.developer_ids(&mut errors),
            support_server_url: self.get("SUPPORT_SERVER_URL").map(str::to_string),
        };

        let logging = self.logging(&mut errors);

        let i18n = self
            .get("LOCALES_DIR")
            .map_or_else(I18nConfig::default, |dir| I18nConfig {
                locales_dir: PathBuf::from(dir),
            });

        let minecraft_defaults = MinecraftConfig::default();
        let minecraft = MinecraftConfig {
            rcon_host: self
                .get("MINECRAFT_RCON_HOST")
                .map_or(minecraft_defaults.rcon_host, str::to_string),
            rcon_port: self.optional(
                "MINECRAFT_RCON_PORT",
                minecraft_defaults.rcon_port,
                "a port number",
                |v| v.parse().ok(),
                &mut errors,
            ),
            rcon_password: self.get("MINECRAFT_RCON_PASSWORD").map(str::to_string),
            relay_channel_id: self.optional(
                "RELAY_CHANNEL_ID",
                None,
                "a Discord snowflake",
                |v| v.parse::<ChannelId>().ok().map(Some),
                &mut errors,
            ),
        };

        if let Some(err) = ConfigError::from_list(errors) {
            return Err(err);
        }

        let (Some(token), Some(dev_guild_id), Some(dev_mode)) = (token, dev_guild_id, dev_mode) else {
            return Err(ConfigError::Validation("required environment is incomplete".to_string()));
        };

        let config = Config {
            discord: DiscordConfig {
                token,
                dev_guild_id,
                dev_mode,
            },
            commands,
            logging,
            i18n,
            minecraft,
        };

        config.validate()?;
        Ok(config)
    }

    /// Logging settings alone, for use before the rest is loaded. Malformed
    /// values fall back to the defaults here and are reported by [`Self::load`].
    pub fn logging_settings(&self) -> LoggingSettings {
        self.logging(&mut Vec::new())
    }

    fn logging(&self, errors: &mut Vec<ConfigError>) -> LoggingSettings {
        LoggingSettings {
            include_timestamps: self.optional_bool(LOG_TIMESTAMPS, false, errors),
        }
    }

    fn optional<T>(
        &self,
        key: &'static str,
        default: T,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
        errors: &mut Vec<ConfigError>,
    ) -> T {
        let Some(raw) = self.get(key) else {
            return default;
        };

        parse(raw).unwrap_or_else(|| {
            errors.push(ConfigError::Invalid {
                key,
                expected,
                value: raw.to_string(),
            });
            default
        })
    }

    fn optional_bool(&self, key: &'static str, default: bool, errors: &mut Vec<ConfigError>) -> bool {
        self.optional(key, default, EnvKind::Boolean.expected(), parse_bool, errors)
    }

    fn developer_ids(&self, errors: &mut Vec<ConfigError>) -> Vec<UserId> {
        let Some(raw) = self.get("DEVELOPER_IDS") else {
            return Vec::new();
        };

        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                part.parse::<UserId>()
                    .map_err(|_| {
                        errors.push(ConfigError::Invalid {
                            key: "DEVELOPER_IDS",
                            expected: "a comma separated list of snowflakes",
                            value: part.to_string(),
                        });
                    })
                    .ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            (DISCORD_CLIENT_TOKEN, "token.value.here"),
            (DEV_DISCORD_GUILD_ID, "111222333444555666"),
            (DEV_MODE, "true"),
        ]
    }

    fn with(extra: &[(&'static str, &'static str)]) -> EnvLoader {
        let mut pairs = required();
        pairs.extend_from_slice(extra);
        EnvLoader::from_pairs(pairs)
    }

    #[test]
    fn test_logging_settings_before_full_load() {
        let loader = EnvLoader::from_pairs([(LOG_TIMESTAMPS, "true")]);
        assert!(loader.logging_settings().include_timestamps);
        assert!(loader.load().is_err());

        let malformed = with(&[(LOG_TIMESTAMPS, "sometimes")]);
        assert!(!malformed.logging_settings().include_timestamps);
        assert!(matches!(malformed.load(), Err(ConfigError::Invalid { key: "LOG_TIMESTAMPS", .. })));

        let config = chatbridge_common::LoggingConfig::from(&loader.logging_settings());
        assert!(config.include_timestamps);
        assert!(config.ansi);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" FALSE "), Some(false));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_load_with_only_required_uses_defaults() {
        let config = with(&[]).load().unwrap();

        assert_eq!(config.discord.token, "token.value.here");
        assert_eq!(config.discord.dev_guild_id, GuildId(111_222_333_444_555_666));
        assert!(config.discord.dev_mode);
        assert_eq!(config.commands, CommandsConfig::default());
        assert_eq!(config.i18n.locales_dir, PathBuf::from("locales"));
        assert_eq!(config.minecraft, MinecraftConfig::default());
        assert!(!config.logging.include_timestamps);
    }

    #[test]
    fn test_missing_required_are_all_reported() {
        let err = EnvLoader::default().load().unwrap_err();
        let keys: Vec<_> = err
            .iter()
            .filter_map(|e| match e {
                ConfigError::Missing { key } => Some(*key),
                _ => None,
            })
            .collect();

        assert_eq!(keys, vec![DISCORD_CLIENT_TOKEN, DEV_DISCORD_GUILD_ID, DEV_MODE]);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let loader = EnvLoader::from_pairs([
            (DISCORD_CLIENT_TOKEN, "   "),
            (DEV_DISCORD_GUILD_ID, "1"),
            (DEV_MODE, "false"),
        ]);
        let errors = loader.check_required();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ConfigError::Missing { key: DISCORD_CLIENT_TOKEN }));
    }

    #[test]
    fn test_malformed_required_values() {
        let loader = EnvLoader::from_pairs([
            (DISCORD_CLIENT_TOKEN, "t"),
            (DEV_DISCORD_GUILD_ID, "not-a-number"),
            (DEV_MODE, "maybe"),
        ]);
        let errors = loader.check_required();

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, ConfigError::Invalid { .. })));
        assert!(errors[0].to_string().contains("DEV_DISCORD_GUILD_ID"));
        assert!(errors[1].to_string().contains("'true' or 'false'"));
    }

    #[test]
    fn test_optional_values_are_parsed() {
        let config = with(&[
            ("COMMAND_ERROR_COOLDOWN_SECONDS", "5"),
            ("LOG_COMMAND_USES", "false"),
            ("DEVELOPER_IDS", "366536353418182657, 123"),
            ("SUPPORT_SERVER_URL", "https://discord.gg/example"),
            ("LOCALES_DIR", "/srv/locales"),
            ("LOG_TIMESTAMPS", "true"),
            ("MINECRAFT_RCON_HOST", "mc.internal"),
            ("MINECRAFT_RCON_PORT", "25580"),
            ("MINECRAFT_RCON_PASSWORD", "hunter2"),
            ("RELAY_CHANNEL_ID", "987654321"),
        ])
        .load()
        .unwrap();

        assert_eq!(config.commands.error_cooldown_seconds, 5);
        assert!(!config.commands.log_command_uses);
        assert_eq!(
            config.commands.developer_ids,
            vec![UserId(366_536_353_418_182_657), UserId(123)]
        );
        assert_eq!(config.commands.support_server_url.as_deref(), Some("https://discord.gg/example"));
        assert_eq!(config.i18n.locales_dir, PathBuf::from("/srv/locales"));
        assert!(config.logging.include_timestamps);
        assert_eq!(config.minecraft.rcon_address(), "mc.internal:25580");
        assert_eq!(config.minecraft.relay_channel_id, Some(ChannelId(987_654_321)));
        assert!(config.minecraft.relay_enabled());
    }

    #[test]
    fn test_optional_errors_are_collected_with_required_ones() {
        let err = EnvLoader::from_pairs([
            ("MINECRAFT_RCON_PORT", "99999"),
            ("DEVELOPER_IDS", "abc"),
        ])
        .load()
        .unwrap_err();

        assert_eq!(err.iter().count(), 5);
    }

    #[test]
    fn test_disallowing_both_install_scopes_fails_validation() {
        let err = with(&[
            ("ALLOW_GUILD_INSTALLED_COMMANDS", "false"),
            ("ALLOW_USER_INSTALLED_COMMANDS", "false"),
        ])
        .load()
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_from_dotenv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DISCORD_CLIENT_TOKEN=abc.def.ghi").unwrap();
        writeln!(file, "DEV_DISCORD_GUILD_ID=42").unwrap();
        writeln!(file, "DEV_MODE=false").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "RELAY_CHANNEL_ID=7").unwrap();

        let config = EnvLoader::from_dotenv_file(file.path()).unwrap().load().unwrap();

        assert_eq!(config.discord.dev_guild_id, GuildId(42));
        assert!(!config.discord.dev_mode);
        assert_eq!(config.minecraft.relay_channel_id, Some(ChannelId(7)));
        assert!(!config.minecraft.relay_enabled());
    }
}
