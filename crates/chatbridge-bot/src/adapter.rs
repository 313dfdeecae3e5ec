//! Serenity implementations of the interaction traits.

use async_trait::async_trait;
use chatbridge_commands::builder::{build_autocomplete, build_edit, build_message};
use chatbridge_commands::{
    AutocompleteChoice, AutocompleteInvocation, CommandInvocation, HandlerError, InvocationTarget, InvocationUser,
    Reply,
};
use chatbridge_common::UserId;
use poise::serenity_prelude as serenity;
use serenity::{CommandInteraction, CreateInteractionResponse, ResolvedTarget};
use std::sync::atomic::{AtomicBool, Ordering};

fn invocation_user(user: &serenity::User) -> InvocationUser {
    InvocationUser {
        id: UserId(user.id.get()),
        name: user.name.clone(),
    }
}

fn display_name(user: &serenity::User) -> &str {
    user.global_name.as_deref().unwrap_or(&user.name)
}

fn resolve_target(interaction: &CommandInteraction) -> InvocationTarget {
    match interaction.data.target() {
        Some(ResolvedTarget::Message(message)) => InvocationTarget::Message {
            id: message.id.get(),
            content: message.content.clone(),
            author: InvocationUser {
                id: UserId(message.author.id.get()),
                name: display_name(&message.author).to_string(),
            },
        },
        Some(ResolvedTarget::User(user, _)) => InvocationTarget::User(invocation_user(user)),
        _ => InvocationTarget::None,
    }
}

/// A slash or context menu interaction received from the gateway.
pub struct SerenityInvocation<'a> {
    ctx: &'a serenity::Context,
    interaction: &'a CommandInteraction,
    user: InvocationUser,
    target: InvocationTarget,
    responded: AtomicBool,
}

impl<'a> SerenityInvocation<'a> {
    /// Wraps `interaction`.
    pub fn new(ctx: &'a serenity::Context, interaction: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            interaction,
            user: invocation_user(&interaction.user),
            target: resolve_target(interaction),
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl CommandInvocation for SerenityInvocation<'_> {
    fn command_name(&self) -> &str {
        &self.interaction.data.name
    }

    fn user(&self) -> &InvocationUser {
        &self.user
    }

    fn locale(&self) -> &str {
        &self.interaction.locale
    }

    fn string_option(&self, name: &str) -> Option<&str> {
        self.interaction
            .data
            .options
            .iter()
            .find(|option| option.name == name)
            .and_then(|option| option.value.as_str())
    }

    fn target(&self) -> &InvocationTarget {
        &self.target
    }

    fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> Result<(), HandlerError> {
        self.interaction
            .create_response(&self.ctx.http, CreateInteractionResponse::Message(build_message(&reply)))
            .await?;
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit_reply(&self, reply: Reply) -> Result<(), HandlerError> {
        self.interaction.edit_response(&self.ctx.http, build_edit(&reply)).await?;
        Ok(())
    }

    async fn defer(&self, ephemeral: bool) -> Result<(), HandlerError> {
        if ephemeral {
            self.interaction.defer_ephemeral(&self.ctx.http).await?;
        } else {
            self.interaction.defer(&self.ctx.http).await?;
        }
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// An autocomplete interaction received from the gateway.
pub struct SerenityAutocomplete<'a> {
    ctx: &'a serenity::Context,
    interaction: &'a CommandInteraction,
    user: InvocationUser,
}

impl<'a> SerenityAutocomplete<'a> {
    /// Wraps `interaction`.
    pub fn new(ctx: &'a serenity::Context, interaction: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            interaction,
            user: invocation_user(&interaction.user),
        }
    }
}

#[async_trait]
impl AutocompleteInvocation for SerenityAutocomplete<'_> {
    fn command_name(&self) -> &str {
        &self.interaction.data.name
    }

    fn user(&self) -> &InvocationUser {
        &self.user
    }

    fn locale(&self) -> &str {
        &self.interaction.locale
    }

    fn focused(&self) -> Option<(&str, &str)> {
        self.interaction
            .data
            .autocomplete()
            .map(|option| (option.name, option.value))
    }

    async fn respond(&self, choices: Vec<AutocompleteChoice>) -> Result<(), HandlerError> {
        self.interaction
            .create_response(
                &self.ctx.http,
                CreateInteractionResponse::Autocomplete(build_autocomplete(choices)),
            )
            .await?;
        Ok(())
    }
}
