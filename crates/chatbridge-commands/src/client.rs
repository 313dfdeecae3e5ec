//! The [`CommandClient`]: registry, options and collaborators shared by every
//! dispatch.

use crate::cooldown::{Clock, CooldownWindows, SystemClock};
use crate::descriptor::{CommandDescriptor, IntegrationType};
use crate::error::CommandError;
use crate::handler::Command;
use crate::interaction::BotIdentity;
use crate::registry::{CommandRegistry, RegisteredCommand};
use chatbridge_common::UserId;
use chatbridge_config::CommandsConfig;
use chatbridge_i18n::I18n;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Client-wide command policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Cooldown after a failed run, shared by every command.
    pub error_cooldown_seconds: u64,
    /// Emit a log line for every command use.
    pub log_command_uses: bool,
    /// Accept guild installed commands.
    pub allow_guild_installed: bool,
    /// Accept user installed commands.
    pub allow_user_installed: bool,
    /// Users allowed to run developer-only commands.
    pub developer_ids: Vec<UserId>,
    /// Invite link shown in error messages and `/help`.
    pub support_server_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::from(&CommandsConfig::default())
    }
}

impl From<&CommandsConfig> for ClientOptions {
    fn from(config: &CommandsConfig) -> Self {
        Self {
            error_cooldown_seconds: config.error_cooldown_seconds,
            log_command_uses: config.log_command_uses,
            allow_guild_installed: config.allow_guild_installed,
            allow_user_installed: config.allow_user_installed,
            developer_ids: config.developer_ids.clone(),
            support_server_url: config.support_server_url.clone(),
        }
    }
}

/// Owns the registered commands and their cooldowns.
#[derive(Debug)]
pub struct CommandClient {
    options: ClientOptions,
    registry: CommandRegistry,
    i18n: Arc<I18n>,
    clock: Arc<dyn Clock>,
    identity: RwLock<Option<BotIdentity>>,
}

impl CommandClient {
    /// Creates a client using the system clock.
    pub fn new(options: ClientOptions, i18n: Arc<I18n>) -> Result<Self, CommandError> {
        if !options.allow_guild_installed && !options.allow_user_installed {
            return Err(CommandError::NoCommandScopeAllowed);
        }

        Ok(Self {
            options,
            registry: CommandRegistry::new(),
            i18n,
            clock: Arc::new(SystemClock),
            identity: RwLock::new(None),
        })
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registers a patched command.
    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        let descriptor = command.descriptor();
        let name = descriptor.name().to_string();

        if !descriptor.is_patched() {
            return Err(CommandError::NotPatched { command: name });
        }

        let scopes = descriptor.install_scopes();
        if scopes.guild_installed && !self.options.allow_guild_installed {
            return Err(CommandError::InstallScopeNotAllowed {
                command: name,
                scope: IntegrationType::GuildInstall,
            });
        }
        if scopes.user_installed && !self.options.allow_user_installed {
            return Err(CommandError::InstallScopeNotAllowed {
                command: name,
                scope: IntegrationType::UserInstall,
            });
        }

        let registered = self.registry.insert(command)?;
        info!(
            tag = "client",
            layer = 2,
            "Imported `{}`",
            registered.command.descriptor().log_name()
        );
        Ok(())
    }

    /// Command policy.
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Translations.
    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Registered commands.
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The command registered under `name`.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.registry.get(name)
    }

    /// Descriptors of every registered command, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.registry.iter().map(|entry| entry.command.descriptor())
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether `user` is on the developer allow-list.
    pub fn is_developer(&self, user: UserId) -> bool {
        self.options.developer_ids.contains(&user)
    }

    /// Cooldown windows of `descriptor`.
    pub fn windows_for(&self, descriptor: &CommandDescriptor) -> CooldownWindows {
        CooldownWindows::from_seconds(descriptor.cooldown_seconds(), self.options.error_cooldown_seconds)
    }

    /// Stores the bot account once the gateway is ready.
    pub fn set_identity(&self, identity: BotIdentity) {
        *self.identity.write() = Some(identity);
    }

    /// The bot account, if known.
    pub fn identity(&self) -> Option<BotIdentity> {
        self.identity.read().clone()
    }

    /// Drops expired cooldown records of every command.
    pub fn purge_expired(&self) -> usize {
        self.registry.purge_expired(self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CommandDescriptor, CommandKind, CommandMetadata, Contexts, InstallScopes};
    use crate::testing::{test_i18n, ScriptedHandler};

    fn command(name: &str, scopes: InstallScopes) -> Command {
        Command::chat_input(
            CommandMetadata::new(name, "test command", scopes, Contexts::All),
            Vec::new(),
            ScriptedHandler::succeeding(),
        )
        .unwrap()
    }

    fn options(guild: bool, user: bool) -> ClientOptions {
        ClientOptions {
            allow_guild_installed: guild,
            allow_user_installed: user,
            ..ClientOptions::default()
        }
    }

    #[test]
    fn test_default_options() {
        let options = ClientOptions::default();
        assert_eq!(options.error_cooldown_seconds, 60);
        assert!(options.log_command_uses);
        assert!(options.allow_guild_installed && options.allow_user_installed);
    }

    #[test]
    fn test_client_requires_a_scope() {
        let err = CommandClient::new(options(false, false), test_i18n()).unwrap_err();
        assert!(matches!(err, CommandError::NoCommandScopeAllowed));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut client = CommandClient::new(ClientOptions::default(), test_i18n()).unwrap();
        client.register(command("ping", InstallScopes::BOTH)).unwrap();

        assert!(client.get("ping").is_some());
        assert!(client.get("pong").is_none());
        assert_eq!(client.registry().len(), 1);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut client = CommandClient::new(ClientOptions::default(), test_i18n()).unwrap();
        client.register(command("ping", InstallScopes::BOTH)).unwrap();

        let err = client.register(command("ping", InstallScopes::GUILD)).unwrap_err();
        assert!(matches!(err, CommandError::DuplicateCommand { ref name } if name == "ping"));
        assert_eq!(client.registry().len(), 1);
    }

    #[test]
    fn test_unpatched_descriptor_is_rejected() {
        let mut client = CommandClient::new(ClientOptions::default(), test_i18n()).unwrap();
        let descriptor = CommandDescriptor::new(
            CommandMetadata::new("raw", "d", InstallScopes::BOTH, Contexts::All),
            CommandKind::ChatInput,
        )
        .unwrap();
        let command = Command::from_descriptor(descriptor, std::sync::Arc::new(ScriptedHandler::succeeding()));

        assert!(matches!(
            client.register(command),
            Err(CommandError::NotPatched { .. })
        ));
    }

    #[test]
    fn test_scope_policy() {
        let mut guild_only = CommandClient::new(options(true, false), test_i18n()).unwrap();
        assert!(matches!(
            guild_only.register(command("a", InstallScopes::USER)),
            Err(CommandError::InstallScopeNotAllowed {
                scope: IntegrationType::UserInstall,
                ..
            })
        ));
        guild_only.register(command("b", InstallScopes::GUILD)).unwrap();

        let mut user_only = CommandClient::new(options(false, true), test_i18n()).unwrap();
        assert!(matches!(
            user_only.register(command("c", InstallScopes::BOTH)),
            Err(CommandError::InstallScopeNotAllowed {
                scope: IntegrationType::GuildInstall,
                ..
            })
        ));
    }

    #[test]
    fn test_identity() {
        let client = CommandClient::new(ClientOptions::default(), test_i18n()).unwrap();
        assert!(client.identity().is_none());
        client.set_identity(BotIdentity {
            id: UserId(5),
            name: "bridge".to_string(),
            avatar_url: None,
        });
        assert_eq!(client.identity().map(|bot| bot.name), Some("bridge".to_string()));
    }
}
