//! Discord to Minecraft chat relay over RCON.

use crate::error::{BotError, BotResult};
use async_trait::async_trait;
use chatbridge_common::{single_line, ChannelId};
use chatbridge_config::MinecraftConfig;
use rcon::Connection;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Builds the `tellraw` command that shows `content` as chat from
/// `display_name` to every player.
pub fn tellraw_command(display_name: &str, content: &str) -> String {
    let text = format!("💬{display_name}> {}", single_line(content));
    format!("tellraw @a {}", serde_json::json!({ "text": text }))
}

/// A Minecraft server console.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Console: Send + Sync {
    /// Runs `command` and returns the server's response.
    async fn send(&self, command: String) -> BotResult<String>;

    /// Closes the connection. Later sends fail.
    async fn close(&self);
}

/// A console reached over RCON.
pub struct RconConsole {
    connection: Mutex<Option<Connection<TcpStream>>>,
}

impl RconConsole {
    /// Connects and authenticates with `password`.
    pub async fn connect(config: &MinecraftConfig, password: &str) -> BotResult<Self> {
        let connection = <Connection<TcpStream>>::builder()
            .enable_minecraft_quirks(true)
            .connect(config.rcon_address(), password)
            .await?;

        info!(tag = "process", "Connected to Minecraft RCON!");
        Ok(Self {
            connection: Mutex::new(Some(connection)),
        })
    }
}

#[async_trait]
impl Console for RconConsole {
    async fn send(&self, command: String) -> BotResult<String> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or(BotError::RconClosed)?;
        Ok(connection.cmd(&command).await?)
    }

    async fn close(&self) {
        if self.connection.lock().await.take().is_some() {
            info!(tag = "process", "Exiting, closing MC RCON connection...");
        }
    }
}

/// The parts of a Discord message the relay looks at.
#[derive(Debug, Clone, Copy)]
pub struct RelayMessage<'a> {
    /// Channel the message was sent in.
    pub channel_id: ChannelId,
    /// Sent by a bot account.
    pub from_bot: bool,
    /// Sent through a webhook.
    pub from_webhook: bool,
    /// Name shown in game.
    pub display_name: &'a str,
    /// Message text.
    pub content: &'a str,
}

/// Forwards messages of one channel to the console.
pub struct ChatRelay {
    channel: ChannelId,
    console: Arc<dyn Console>,
}

impl ChatRelay {
    /// Relays `channel` to `console`.
    pub fn new(channel: ChannelId, console: Arc<dyn Console>) -> Self {
        Self { channel, console }
    }

    /// The relayed channel.
    pub const fn channel(&self) -> ChannelId {
        self.channel
    }

    /// The console messages go to.
    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }

    /// Whether `message` should appear in game.
    pub fn accepts(&self, message: &RelayMessage<'_>) -> bool {
        message.channel_id == self.channel && !message.from_bot && !message.from_webhook
    }

    /// Sends `message` to the console if it is accepted. Returns whether it
    /// was sent.
    pub async fn forward(&self, message: &RelayMessage<'_>) -> BotResult<bool> {
        if !self.accepts(message) {
            return Ok(false);
        }

        let command = tellraw_command(message.display_name, message.content);
        let response = self.console.send(command).await?;
        debug!(tag = "debug", "Relayed message from {}: {response}", message.display_name);
        Ok(true)
    }
}
