//! Name-indexed storage of registered commands and their cooldown stores.

use crate::cooldown::CooldownStore;
use crate::error::CommandError;
use crate::handler::Command;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A command together with the cooldowns of its users.
#[derive(Debug)]
pub struct RegisteredCommand {
    /// The command.
    pub command: Command,
    /// Cooldown records of this command.
    pub cooldowns: CooldownStore,
}

/// Commands in registration order, looked up by name.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    by_name: HashMap<String, usize>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `command` with an empty cooldown store.
    pub fn insert(&mut self, command: Command) -> Result<&RegisteredCommand, CommandError> {
        let name = command.descriptor().name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(CommandError::DuplicateCommand { name });
        }

        let index = self.commands.len();
        self.commands.push(RegisteredCommand {
            command,
            cooldowns: CooldownStore::new(),
        });
        self.by_name.insert(name, index);
        Ok(&self.commands[index])
    }

    /// The command registered under `name`.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.by_name.get(name).and_then(|index| self.commands.get(*index))
    }

    /// Every command in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter()
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Purges expired cooldowns of every command.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        self.commands.iter().map(|entry| entry.cooldowns.purge_expired(now)).sum()
    }
}
