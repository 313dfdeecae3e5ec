//! Default values for the optional settings.

use crate::schema::{CommandsConfig, I18nConfig, MinecraftConfig};
use std::path::PathBuf;

/// Default error cooldown in seconds.
pub const DEFAULT_ERROR_COOLDOWN_SECONDS: u64 = 60;
/// Default locales directory.
pub const DEFAULT_LOCALES_DIR: &str = "locales";
/// Default RCON host.
pub const DEFAULT_RCON_HOST: &str = "127.0.0.1";
/// Default RCON port.
pub const DEFAULT_RCON_PORT: u16 = 25575;

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            error_cooldown_seconds: DEFAULT_ERROR_COOLDOWN_SECONDS,
            log_command_uses: true,
            allow_guild_installed: true,
            allow_user_installed: true,
            developer_ids: Vec::new(),
            support_server_url: None,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales_dir: PathBuf::from(DEFAULT_LOCALES_DIR),
        }
    }
}

impl Default for MinecraftConfig {
    fn default() -> Self {
        Self {
            rcon_host: DEFAULT_RCON_HOST.to_string(),
            rcon_port: DEFAULT_RCON_PORT,
            rcon_password: None,
            relay_channel_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_defaults() {
        let commands = CommandsConfig::default();
        assert_eq!(commands.error_cooldown_seconds, 60);
        assert!(commands.log_command_uses);
        assert!(commands.allow_guild_installed && commands.allow_user_installed);
        assert!(commands.developer_ids.is_empty());
    }

    #[test]
    fn test_minecraft_defaults() {
        let minecraft = MinecraftConfig::default();
        assert_eq!(minecraft.rcon_address(), "127.0.0.1:25575");
        assert!(!minecraft.relay_enabled());
    }
}
