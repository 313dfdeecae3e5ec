//! Command handlers and the [`Command`] type binding one to its descriptor.

use crate::client::CommandClient;
use crate::descriptor::{CommandDescriptor, CommandKind, CommandMetadata, CommandOption};
use crate::error::{CommandError, HandlerError};
use crate::interaction::{AutocompleteInvocation, CommandInvocation};
use async_trait::async_trait;
use std::sync::Arc;

/// Behaviour of a command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command. `Ok(true)` applies the cooldown, `Ok(false)` skips
    /// it and `Err` counts as a failure.
    async fn execute(&self, invocation: &dyn CommandInvocation, client: &CommandClient) -> Result<bool, HandlerError>;

    /// Answers an autocomplete request.
    async fn autocomplete(
        &self,
        _invocation: &dyn AutocompleteInvocation,
        _client: &CommandClient,
    ) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Whether [`autocomplete`](Self::autocomplete) is implemented.
    fn has_autocomplete(&self) -> bool {
        false
    }
}

/// A descriptor together with its handler.
pub struct Command {
    descriptor: CommandDescriptor,
    handler: Arc<dyn CommandHandler>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl Command {
    fn patched(
        metadata: CommandMetadata,
        kind: CommandKind,
        options: Vec<CommandOption>,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<Self, CommandError> {
        let mut descriptor = CommandDescriptor::new(metadata, kind)?.with_options(options);
        descriptor.patch();
        Ok(Self { descriptor, handler })
    }

    /// A slash command.
    pub fn chat_input(
        metadata: CommandMetadata,
        options: Vec<CommandOption>,
        handler: impl CommandHandler + 'static,
    ) -> Result<Self, CommandError> {
        Self::patched(metadata, CommandKind::ChatInput, options, Arc::new(handler))
    }

    /// A message context menu command.
    pub fn message_context(
        metadata: CommandMetadata,
        handler: impl CommandHandler + 'static,
    ) -> Result<Self, CommandError> {
        Self::patched(metadata, CommandKind::MessageContext, Vec::new(), Arc::new(handler))
    }

    /// A user context menu command.
    pub fn user_context(metadata: CommandMetadata, handler: impl CommandHandler + 'static) -> Result<Self, CommandError> {
        Self::patched(metadata, CommandKind::UserContext, Vec::new(), Arc::new(handler))
    }

    /// Binds an existing descriptor as is, without patching it.
    pub fn from_descriptor(descriptor: CommandDescriptor, handler: Arc<dyn CommandHandler>) -> Self {
        Self { descriptor, handler }
    }

    /// The descriptor.
    pub const fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    /// The handler.
    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }

    /// Whether autocomplete requests should reach the handler.
    pub fn supports_autocomplete(&self) -> bool {
        self.descriptor.kind() == CommandKind::ChatInput && self.handler.has_autocomplete()
    }
}
