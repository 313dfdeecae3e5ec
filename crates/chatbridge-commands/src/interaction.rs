//! The view of a Discord interaction that handlers and the dispatcher see.
//!
//! The bot implements these traits on top of serenity's interaction types;
//! tests implement them with in-memory recorders.

use crate::error::HandlerError;
use crate::reply::Reply;
use async_trait::async_trait;
use chatbridge_common::UserId;

/// The user behind an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationUser {
    /// User id.
    pub id: UserId,
    /// Username shown in logs.
    pub name: String,
}

/// What a context menu command was used on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationTarget {
    /// Slash commands have no target.
    None,
    /// A message context menu entry.
    Message {
        /// Message id.
        id: u64,
        /// Message text.
        content: String,
        /// Message author.
        author: InvocationUser,
    },
    /// A user context menu entry.
    User(InvocationUser),
}

/// A command interaction.
#[async_trait]
pub trait CommandInvocation: Send + Sync {
    /// Name of the invoked command.
    fn command_name(&self) -> &str;

    /// The invoking user.
    fn user(&self) -> &InvocationUser;

    /// Discord locale code of the invoking user.
    fn locale(&self) -> &str;

    /// Value of a string option, if given.
    fn string_option(&self, name: &str) -> Option<&str>;

    /// Target of a context menu command.
    fn target(&self) -> &InvocationTarget;

    /// Whether a reply was sent or deferred already.
    fn has_responded(&self) -> bool;

    /// Sends the initial response.
    async fn reply(&self, reply: Reply) -> Result<(), HandlerError>;

    /// Replaces the initial response.
    async fn edit_reply(&self, reply: Reply) -> Result<(), HandlerError>;

    /// Acknowledges the interaction so the reply can come later.
    async fn defer(&self, ephemeral: bool) -> Result<(), HandlerError>;
}

/// A suggestion returned to an autocomplete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteChoice {
    /// Text shown to the user.
    pub name: String,
    /// Value filled into the option.
    pub value: String,
}

/// An autocomplete request.
#[async_trait]
pub trait AutocompleteInvocation: Send + Sync {
    /// Name of the command being typed.
    fn command_name(&self) -> &str;

    /// The typing user.
    fn user(&self) -> &InvocationUser;

    /// Discord locale code of the user.
    fn locale(&self) -> &str;

    /// Name and partial value of the focused option.
    fn focused(&self) -> Option<(&str, &str)>;

    /// Sends the suggestions.
    async fn respond(&self, choices: Vec<AutocompleteChoice>) -> Result<(), HandlerError>;
}

/// The bot's own account, known once the gateway is ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Application user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar_url: Option<String>,
}

impl BotIdentity {
    /// OAuth2 link that adds the bot.
    pub fn invite_url(&self) -> String {
        format!("https://discord.com/oauth2/authorize?client_id={}", self.id)
    }
}
