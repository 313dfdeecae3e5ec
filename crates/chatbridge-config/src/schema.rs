//! Configuration schema definitions.

use chatbridge_common::{ChannelId, GuildId, LoggingConfig, UserId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the chatbridge bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Discord connection settings.
    pub discord: DiscordConfig,
    /// Command handling policy.
    pub commands: CommandsConfig,
    /// Console logging settings.
    pub logging: LoggingSettings,
    /// Localisation settings.
    pub i18n: I18nConfig,
    /// Minecraft RCON and chat relay settings.
    pub minecraft: MinecraftConfig,
}

/// Discord connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token.
    pub token: String,
    /// Guild that receives commands in development mode.
    pub dev_guild_id: GuildId,
    /// Deploy commands to the development guild instead of globally.
    pub dev_mode: bool,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("dev_guild_id", &self.dev_guild_id)
            .field("dev_mode", &self.dev_mode)
            .finish()
    }
}

/// Command handling policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Cooldown applied after a command fails, in seconds.
    pub error_cooldown_seconds: u64,
    /// Emit one log line per command use.
    pub log_command_uses: bool,
    /// Accept commands that can be installed to guilds.
    pub allow_guild_installed: bool,
    /// Accept commands that can be installed to users.
    pub allow_user_installed: bool,
    /// Users allowed to run developer-only commands.
    pub developer_ids: Vec<UserId>,
    /// Invite link shown in error and help messages.
    pub support_server_url: Option<String>,
}

/// Console logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Prefix each line with the local time.
    pub include_timestamps: bool,
}

impl From<&LoggingSettings> for LoggingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            include_timestamps: settings.include_timestamps,
            ..Self::default()
        }
    }
}

/// Localisation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Directory containing one sub-directory per locale.
    pub locales_dir: PathBuf,
}

/// Minecraft RCON and chat relay settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftConfig {
    /// RCON host.
    pub rcon_host: String,
    /// RCON port.
    pub rcon_port: u16,
    /// RCON password. The relay is disabled without one.
    pub rcon_password: Option<String>,
    /// Discord channel whose messages are relayed.
    pub relay_channel_id: Option<ChannelId>,
}

impl MinecraftConfig {
    /// `host:port` address of the RCON server.
    pub fn rcon_address(&self) -> String {
        format!("{}:{}", self.rcon_host, self.rcon_port)
    }

    /// Whether both halves of the relay are configured.
    pub const fn relay_enabled(&self) -> bool {
        self.rcon_password.is_some() && self.relay_channel_id.is_some()
    }
}

impl std::fmt::Debug for MinecraftConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinecraftConfig")
            .field("rcon_host", &self.rcon_host)
            .field("rcon_port", &self.rcon_port)
            .field("rcon_password", &self.rcon_password.as_ref().map(|_| "<redacted>"))
            .field("relay_channel_id", &self.relay_channel_id)
            .finish()
    }
}
