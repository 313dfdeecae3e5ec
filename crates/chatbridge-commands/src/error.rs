//! Error types for command construction, registration and deployment.

use crate::descriptor::IntegrationType;
use thiserror::Error;

/// Error type returned by command handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while building, registering or deploying commands.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Neither install flag is set.
    #[error("{command} must be available in at least one installation context")]
    NoInstallContext {
        /// Command name.
        command: String,
    },

    /// An explicit context list was empty.
    #[error("{command} must be usable in at least one interaction context")]
    NoInteractionContext {
        /// Command name.
        command: String,
    },

    /// The descriptor was registered before being patched.
    #[error("{command} is not patched")]
    NotPatched {
        /// Command name.
        command: String,
    },

    /// The descriptor asks for an install scope the client rejects.
    #[error("{command} is {scope} installed but the client doesn't allow it")]
    InstallScopeNotAllowed {
        /// Command name.
        command: String,
        /// The rejected scope.
        scope: IntegrationType,
    },

    /// Another command already uses this name.
    #[error("a command named '{name}' is already registered")]
    DuplicateCommand {
        /// Command name.
        name: String,
    },

    /// The client allows neither guild nor user installed commands.
    #[error("at least one type of command must be allowed")]
    NoCommandScopeAllowed,

    /// Talking to Discord failed while replacing the command list.
    #[error("failed to sync commands with Discord")]
    Sync(#[source] HandlerError),
}
