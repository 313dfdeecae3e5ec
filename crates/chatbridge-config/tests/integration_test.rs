//! Integration tests for chatbridge-config crate.

use chatbridge_common::test_utils::discord_fixtures;
use chatbridge_config::{ConfigError, EnvLoader, REQUIRED_ENV};
use proptest::prelude::*;

#[test]
fn test_required_env_names() {
    let keys: Vec<_> = REQUIRED_ENV.iter().map(|spec| spec.key).collect();
    assert_eq!(keys, ["DISCORD_CLIENT_TOKEN", "DEV_DISCORD_GUILD_ID", "DEV_MODE"]);
}

#[test]
fn test_full_environment() {
    let guild = discord_fixtures::test_guild_id().to_string();
    let developer = discord_fixtures::test_developer_id().to_string();
    let channel = discord_fixtures::test_channel_id().to_string();

    let config = EnvLoader::from_pairs([
        ("DISCORD_CLIENT_TOKEN", "abc.def.ghi"),
        ("DEV_DISCORD_GUILD_ID", guild.as_str()),
        ("DEV_MODE", "false"),
        ("DEVELOPER_IDS", developer.as_str()),
        ("MINECRAFT_RCON_PASSWORD", "secret"),
        ("RELAY_CHANNEL_ID", channel.as_str()),
    ])
    .load()
    .unwrap();

    assert_eq!(config.discord.dev_guild_id, discord_fixtures::test_guild_id());
    assert_eq!(config.commands.developer_ids, vec![discord_fixtures::test_developer_id()]);
    assert!(config.minecraft.relay_enabled());
}

#[test]
fn test_secrets_are_not_debug_printed() {
    let config = EnvLoader::from_pairs([
        ("DISCORD_CLIENT_TOKEN", "super-secret-token"),
        ("DEV_DISCORD_GUILD_ID", "5"),
        ("DEV_MODE", "true"),
        ("MINECRAFT_RCON_PASSWORD", "rcon-password"),
    ])
    .load()
    .unwrap();

    let debug = format!("{config:?}");
    assert!(!debug.contains("super-secret-token"));
    assert!(!debug.contains("rcon-password"));
}

proptest! {
    #[test]
    fn test_any_error_cooldown_is_accepted(seconds in 0u64..100_000) {
        let value = seconds.to_string();
        let config = EnvLoader::from_pairs([
            ("DISCORD_CLIENT_TOKEN", "t"),
            ("DEV_DISCORD_GUILD_ID", "9"),
            ("DEV_MODE", "true"),
            ("COMMAND_ERROR_COOLDOWN_SECONDS", value.as_str()),
        ])
        .load()
        .unwrap();
        prop_assert_eq!(config.commands.error_cooldown_seconds, seconds);
    }

    #[test]
    fn test_non_boolean_dev_mode_is_invalid(value in "[a-z]{1,8}") {
        prop_assume!(value != "true" && value != "false");
        let err = EnvLoader::from_pairs([
            ("DISCORD_CLIENT_TOKEN", "t"),
            ("DEV_DISCORD_GUILD_ID", "9"),
            ("DEV_MODE", value.as_str()),
        ])
        .load()
        .unwrap_err();
        let is_invalid = matches!(err, ConfigError::Invalid { key: "DEV_MODE", .. });
        prop_assert!(is_invalid);
    }
}
