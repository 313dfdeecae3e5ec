//! # Chatbridge Bot
//!
//! Discord bot that hosts the chatbridge command set on poise and relays
//! chat from one Discord channel to a Minecraft server over RCON.
//!
//! This is the main binary crate that orchestrates the startup sequence:
//! logging, arguments, environment, translations, the RCON connection,
//! command registration and deployment, and finally the gateway login.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod args;
pub mod bot;
pub mod deploy;
pub mod error;
pub mod events;
pub mod relay;

pub use args::Args;
pub use bot::ChatBridge;
pub use error::{BotError, BotResult};
pub use events::Data;
pub use relay::{tellraw_command, ChatRelay, Console, RconConsole, RelayMessage};
