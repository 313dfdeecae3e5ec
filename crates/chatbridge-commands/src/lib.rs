//! # Chatbridge Commands
//!
//! The command model of the chatbridge bot: descriptors and their handlers,
//! per-user cooldowns, the registry owned by [`CommandClient`], the
//! [`Dispatcher`] that runs an interaction through the gate, and deployment
//! of the command list to Discord.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod client;
pub mod cooldown;
pub mod deploy;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod help;
pub mod interaction;
pub mod registry;
pub mod reply;

#[cfg(test)]
mod testing;

pub use client::{ClientOptions, CommandClient};
pub use cooldown::{
    Clock, CooldownKind, CooldownRecord, CooldownStore, CooldownWindows, ExecutionOutcome, Gate, ManualClock,
    SystemClock,
};
pub use deploy::{deploy_commands, remove_all_commands, CommandSync, DeployScope};
pub use descriptor::{
    CommandDescriptor, CommandGroup, CommandKind, CommandMetadata, CommandOption, Contexts, InstallScopes,
    IntegrationType, InteractionContextKind, LocalizedField, RemoteId,
};
pub use dispatcher::{Dispatcher, RunResult};
pub use error::{CommandError, HandlerError};
pub use handler::{Command, CommandHandler};
pub use help::{help_command, HelpCommand};
pub use interaction::{AutocompleteChoice, AutocompleteInvocation, BotIdentity, CommandInvocation, InvocationTarget, InvocationUser};
pub use registry::{CommandRegistry, RegisteredCommand};
pub use reply::{emb, Embed, EmbedField, EmbedFooter, EmbedKind, LinkButton, Reply};
