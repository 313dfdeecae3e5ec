//! Replacing the command list registered with Discord.

use crate::builder::build_command;
use crate::client::CommandClient;
use crate::descriptor::RemoteId;
use crate::error::{CommandError, HandlerError};
use async_trait::async_trait;
use chatbridge_common::GuildId;
use serenity::all::CreateCommand;
use std::fmt;
use tracing::{info, warn};

/// Where commands are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployScope {
    /// Only in one guild, used while developing.
    Guild(GuildId),
    /// Everywhere.
    Global,
}

impl DeployScope {
    /// The development guild in dev mode, otherwise global.
    pub const fn for_mode(dev_mode: bool, dev_guild: GuildId) -> Self {
        if dev_mode {
            Self::Guild(dev_guild)
        } else {
            Self::Global
        }
    }
}

impl fmt::Display for DeployScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guild(id) => write!(f, "guild {id}"),
            Self::Global => f.write_str("global"),
        }
    }
}

/// Bulk overwrite of the remote command list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandSync: Send + Sync {
    /// Replaces every command in `scope` with `commands` and returns the
    /// `(name, id)` pairs Discord assigned.
    async fn replace_all(
        &self,
        scope: DeployScope,
        commands: Vec<CreateCommand>,
    ) -> Result<Vec<(String, u64)>, HandlerError>;
}

/// Deploys every registered command and stores the ids Discord assigned.
pub async fn deploy_commands(
    client: &CommandClient,
    sync: &dyn CommandSync,
    scope: DeployScope,
) -> Result<usize, CommandError> {
    let commands: Vec<CreateCommand> = client.descriptors().map(build_command).collect();
    info!(tag = "client", layer = 1, "Sending {} commands ({scope})", commands.len());

    let deployed = sync.replace_all(scope, commands).await.map_err(CommandError::Sync)?;

    info!(tag = "client", layer = 1, "Retrieving command ID's");
    let mut gathered = 0;
    for (name, id) in deployed {
        let Some(entry) = client.get(&name) else {
            warn!(tag = "warn", "Discord returned unknown command '{name}'");
            continue;
        };
        let descriptor = entry.command.descriptor();
        descriptor.set_remote_id(RemoteId(id));
        gathered += 1;
        info!(
            tag = "client",
            layer = 2,
            "Gathered ID for {} ({id})",
            descriptor.log_name()
        );
    }

    info!(tag = "client", "Deployed API commands");
    Ok(gathered)
}

/// Removes every command in `scope`.
pub async fn remove_all_commands(sync: &dyn CommandSync, scope: DeployScope) -> Result<(), CommandError> {
    sync.replace_all(scope, Vec::new()).await.map_err(CommandError::Sync)?;
    info!(tag = "client", "Removed all API commands ({scope})");
    Ok(())
}
