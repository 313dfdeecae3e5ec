//! Gateway event handling.

use crate::adapter::{SerenityAutocomplete, SerenityInvocation};
use crate::relay::{ChatRelay, RelayMessage};
use chatbridge_commands::{BotIdentity, CommandClient, Dispatcher, HandlerError};
use chatbridge_common::{report_error, ChannelId, UserId};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shared application state handed to every event.
pub struct Data {
    /// Registered commands and their cooldowns.
    pub client: Arc<CommandClient>,
    /// The chat relay, when RCON is configured.
    pub relay: Option<Arc<ChatRelay>>,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("commands", &self.client.registry().len())
            .field("relay", &self.relay.as_ref().map(|relay| relay.channel()))
            .finish()
    }
}

/// Names of the events handled here, logged at startup.
pub const HANDLED_EVENTS: [&str; 3] = ["ready", "interaction_create", "message"];

/// The bot account as seen by the command layer.
pub fn bot_identity(user: &serenity::CurrentUser) -> BotIdentity {
    BotIdentity {
        id: UserId(user.id.get()),
        name: user.name.clone(),
        avatar_url: user.avatar_url(),
    }
}

/// Handles one gateway event.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, HandlerError>,
    data: &Data,
) -> Result<(), HandlerError> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            data.client.set_identity(bot_identity(&data_about_bot.user));
            info!(
                tag = "client",
                "Logged in as {} ({})",
                data_about_bot.user.name,
                data_about_bot.user.id
            );
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            let dispatcher = Dispatcher::new(&data.client);
            match interaction {
                serenity::Interaction::Command(command) => {
                    let invocation = SerenityInvocation::new(ctx, command);
                    if let Some(result) = dispatcher.run(&invocation).await {
                        debug!(tag = "debug", "/{} finished: {result}", command.data.name);
                    }
                }
                serenity::Interaction::Autocomplete(autocomplete) => {
                    dispatcher
                        .autocomplete(&SerenityAutocomplete::new(ctx, autocomplete))
                        .await;
                }
                _ => {}
            }
        }
        serenity::FullEvent::Message { new_message } => {
            let Some(relay) = &data.relay else {
                return Ok(());
            };

            let author = &new_message.author;
            let message = RelayMessage {
                channel_id: ChannelId(new_message.channel_id.get()),
                from_bot: author.bot,
                from_webhook: new_message.webhook_id.is_some(),
                display_name: author.global_name.as_deref().unwrap_or(&author.name),
                content: &new_message.content,
            };
            if let Err(err) = relay.forward(&message).await {
                error!(tag = "error", "Couldn't relay a message to Minecraft");
                report_error(&err);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Global error handler for the framework.
pub async fn on_error(error: poise::FrameworkError<'_, Data, HandlerError>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(tag = "error", "Failed to start bot");
            report_error(&*error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(tag = "error", "Error in event handler for {}", event.snake_case_name());
            report_error(&*error);
        }
        error => {
            error!(tag = "error", "Framework error: {error}");
        }
    }
}
