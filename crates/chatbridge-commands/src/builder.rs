//! Conversion of descriptors and replies into serenity builders.

use crate::descriptor::{CommandDescriptor, CommandKind, CommandOption, IntegrationType, InteractionContextKind};
use crate::interaction::AutocompleteChoice;
use crate::reply::{Embed, LinkButton, Reply};
use serenity::all::{
    CommandOptionType, CommandType, CreateActionRow, CreateAutocompleteResponse, CreateButton, CreateCommand,
    CreateCommandOption, CreateEmbed, CreateEmbedFooter, CreateInteractionResponseMessage, EditInteractionResponse,
    InstallationContext, InteractionContext, ReactionType, Timestamp,
};

const fn installation_context(integration: IntegrationType) -> InstallationContext {
    match integration {
        IntegrationType::GuildInstall => InstallationContext::Guild,
        IntegrationType::UserInstall => InstallationContext::User,
    }
}

const fn interaction_context(context: InteractionContextKind) -> InteractionContext {
    match context {
        InteractionContextKind::Guild => InteractionContext::Guild,
        InteractionContextKind::BotDm => InteractionContext::BotDm,
        InteractionContextKind::PrivateChannel => InteractionContext::PrivateChannel,
    }
}

fn build_option(option: &CommandOption) -> CreateCommandOption {
    let mut builder = CreateCommandOption::new(CommandOptionType::String, &option.name, &option.description)
        .required(option.required)
        .set_autocomplete(option.autocomplete);

    for (locale, name) in &option.name_localizations {
        builder = builder.name_localized(locale, name);
    }
    for (locale, description) in &option.description_localizations {
        builder = builder.description_localized(locale, description);
    }
    builder
}

/// The registration payload of a patched descriptor.
pub fn build_command(descriptor: &CommandDescriptor) -> CreateCommand {
    let metadata = descriptor.metadata();
    let mut command = CreateCommand::new(descriptor.name())
        .integration_types(
            descriptor
                .integration_types()
                .iter()
                .copied()
                .map(installation_context)
                .collect(),
        )
        .contexts(descriptor.contexts().iter().copied().map(interaction_context).collect());

    for (locale, name) in &metadata.name_localizations {
        command = command.name_localized(locale, name);
    }

    match descriptor.kind() {
        CommandKind::ChatInput => {
            command = command.kind(CommandType::ChatInput).description(descriptor.description());
            for (locale, description) in &metadata.description_localizations {
                command = command.description_localized(locale, description);
            }
            for option in descriptor.options() {
                command = command.add_option(build_option(option));
            }
        }
        CommandKind::MessageContext => command = command.kind(CommandType::Message),
        CommandKind::UserContext => command = command.kind(CommandType::User),
    }

    command
}

/// Serenity embed for `embed`.
pub fn build_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new().colour(embed.color);

    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(thumbnail) = &embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(footer) = &embed.footer {
        let mut create = CreateEmbedFooter::new(&footer.text);
        if let Some(icon) = &footer.icon_url {
            create = create.icon_url(icon);
        }
        builder = builder.footer(create);
    }
    if embed.timestamp {
        builder = builder.timestamp(Timestamp::now());
    }
    builder
}

fn build_button(button: &LinkButton) -> CreateButton {
    let mut builder = CreateButton::new_link(&button.url).label(&button.label);
    if let Some(emoji) = button.emoji {
        builder = builder.emoji(ReactionType::Unicode(emoji.to_string()));
    }
    builder
}

/// Link buttons of `reply`, in one action row.
pub fn build_components(reply: &Reply) -> Vec<CreateActionRow> {
    if reply.buttons.is_empty() {
        return Vec::new();
    }
    vec![CreateActionRow::Buttons(reply.buttons.iter().map(build_button).collect())]
}

/// Initial interaction response for `reply`.
pub fn build_message(reply: &Reply) -> CreateInteractionResponseMessage {
    let mut message = CreateInteractionResponseMessage::new()
        .embeds(reply.embeds.iter().map(build_embed).collect())
        .components(build_components(reply))
        .ephemeral(reply.ephemeral);

    if let Some(content) = &reply.content {
        message = message.content(content);
    }
    message
}

/// Edit of an interaction response. Ephemerality can't change after the
/// first response.
pub fn build_edit(reply: &Reply) -> EditInteractionResponse {
    let mut edit = EditInteractionResponse::new()
        .embeds(reply.embeds.iter().map(build_embed).collect())
        .components(build_components(reply));

    if let Some(content) = &reply.content {
        edit = edit.content(content);
    }
    edit
}

/// Autocomplete response with `choices`.
pub fn build_autocomplete(choices: Vec<AutocompleteChoice>) -> CreateAutocompleteResponse {
    choices
        .into_iter()
        .fold(CreateAutocompleteResponse::new(), |response, choice| {
            response.add_string_choice(choice.name, choice.value)
        })
}
