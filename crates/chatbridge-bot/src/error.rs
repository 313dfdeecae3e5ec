//! Application-wide error types using thiserror.

use chatbridge_commands::CommandError;
use chatbridge_common::BridgeError;
use chatbridge_config::ConfigError;
use chatbridge_i18n::I18nError;
use poise::serenity_prelude as serenity;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Environment configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging or other shared infrastructure error.
    #[error(transparent)]
    Common(#[from] BridgeError),

    /// Translations couldn't be loaded.
    #[error("Localisation error: {0}")]
    I18n(#[from] I18nError),

    /// Command construction, registration or deployment failed.
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// Minecraft RCON error.
    #[error("RCON error: {0}")]
    Rcon(#[from] rcon::Error),

    /// The RCON connection was already closed.
    #[error("RCON connection is closed")]
    RconClosed,
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
