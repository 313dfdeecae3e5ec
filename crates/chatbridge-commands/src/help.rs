//! The `/help` command.
//!
//! Without an argument it lists every command the user may run, grouped by
//! [`CommandGroup`]. With a command name it shows that command's details.

use crate::client::CommandClient;
use crate::descriptor::{CommandDescriptor, CommandGroup, CommandMetadata, CommandOption, Contexts, InstallScopes, LocalizedField};
use crate::error::{CommandError, HandlerError};
use crate::handler::{Command, CommandHandler};
use crate::interaction::{AutocompleteChoice, AutocompleteInvocation, CommandInvocation};
use crate::reply::{emb, Embed, EmbedKind, Reply};
use async_trait::async_trait;
use chatbridge_common::{capitalize, format_clock, UserId};
use chatbridge_i18n::{fluent_args, I18n, DEFAULT_LOCALE};

const HELP_COOLDOWN_SECONDS: u64 = 5;
const MAX_AUTOCOMPLETE_CHOICES: usize = 25;
const COMMAND_OPTION: &str = "command";

/// Builds `/help` with its names and descriptions taken from `i18n`.
pub fn help_command(i18n: &I18n) -> Result<Command, CommandError> {
    let metadata = CommandMetadata::new(
        i18n.t("commands-help-name", DEFAULT_LOCALE, None),
        i18n.t("commands-help-description", DEFAULT_LOCALE, None),
        InstallScopes::BOTH,
        Contexts::All,
    )
    .name_localizations(i18n.localization_map("commands-help-name"))
    .description_localizations(i18n.localization_map("commands-help-description"))
    .cooldown(HELP_COOLDOWN_SECONDS)
    .group(CommandGroup::General);

    let option = CommandOption::string(
        COMMAND_OPTION,
        i18n.t("commands-help-option1-description", DEFAULT_LOCALE, None),
    )
    .name_localizations(i18n.localization_map("commands-help-option1-name"))
    .description_localizations(i18n.localization_map("commands-help-option1-description"))
    .autocomplete();

    Command::chat_input(metadata, vec![option], HelpCommand)
}

/// Handler of `/help`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelpCommand;

fn visible<'a>(client: &'a CommandClient, user: UserId) -> impl Iterator<Item = &'a CommandDescriptor> {
    let developer = client.is_developer(user);
    client
        .descriptors()
        .filter(move |descriptor| developer || !descriptor.developer_only())
}

fn localized<'a>(descriptor: &'a CommandDescriptor, field: LocalizedField, locale: &str) -> &'a str {
    descriptor.localized(field, locale).unwrap_or_default()
}

impl HelpCommand {
    fn overview(client: &CommandClient, user: UserId, locale: &str) -> Reply {
        let i18n = client.i18n();
        let identity = client.identity();
        let bot_name = identity
            .as_ref()
            .map_or_else(|| "chatbridge".to_string(), |bot| bot.name.clone());

        let args = fluent_args!("botName" => bot_name.clone());
        let mut embed = Embed::new(EmbedKind::Info)
            .title(bot_name)
            .description(i18n.t("commands-help-strings-bot-description", locale, args.as_ref()))
            .thumbnail(identity.as_ref().and_then(|bot| bot.avatar_url.clone()))
            .footer(i18n.t("commands-help-strings-tip", locale, None), None);

        for group in CommandGroup::ALL {
            let lines: Vec<String> = visible(client, user)
                .filter(|descriptor| descriptor.group() == group)
                .map(|descriptor| {
                    format!(
                        "{} - {}",
                        localized(descriptor, LocalizedField::Name, locale),
                        localized(descriptor, LocalizedField::Description, locale)
                    )
                })
                .collect();
            if lines.is_empty() {
                continue;
            }

            let args = fluent_args!("groupName" => capitalize(&group.localized_name(i18n, locale)));
            embed = embed.field(
                i18n.t("commands-help-strings-group-commands", locale, args.as_ref()),
                lines.join("\n"),
                false,
            );
        }

        let mut reply = Reply::embed(embed).ephemeral();
        if let Some(url) = &client.options().support_server_url {
            reply = reply.button(i18n.t("commands-help-strings-support-server", locale, None), url, Some('🛟'));
        }
        if let Some(bot) = &identity {
            let args = fluent_args!("botName" => bot.name.clone());
            reply = reply.button(
                i18n.t("commands-help-strings-add-bot", locale, args.as_ref()),
                bot.invite_url(),
                Some('➕'),
            );
        }
        reply
    }

    fn details(client: &CommandClient, descriptor: &CommandDescriptor, locale: &str) -> Reply {
        let i18n = client.i18n();
        let mut description = localized(descriptor, LocalizedField::Description, locale).to_string();
        if let Some(help_text) = descriptor.localized(LocalizedField::HelpText, locale) {
            description.push_str("\n\n");
            description.push_str(help_text);
        }

        let embed = Embed::new(EmbedKind::Info)
            .title(localized(descriptor, LocalizedField::Name, locale))
            .description(description)
            .field(
                i18n.t("commands-help-strings-group", locale, None),
                capitalize(&descriptor.group().localized_name(i18n, locale)),
                true,
            )
            .field(
                i18n.t("commands-help-strings-cooldown", locale, None),
                format_clock(descriptor.cooldown_seconds()),
                true,
            );

        Reply::embed(embed).ephemeral()
    }

    fn unknown(client: &CommandClient, name: &str, locale: &str) -> Reply {
        let i18n = client.i18n();
        let args = fluent_args!("commandName" => name.to_string());
        let embed = emb(
            EmbedKind::Error,
            i18n.t("commands-help-strings-unknown-command-description", locale, args.as_ref()),
        )
        .title(i18n.t("commands-help-strings-unknown-command-title", locale, None));

        Reply::embed(embed).ephemeral()
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(&self, invocation: &dyn CommandInvocation, client: &CommandClient) -> Result<bool, HandlerError> {
        let locale = invocation.locale();
        let user = invocation.user().id;

        let Some(name) = invocation.string_option(COMMAND_OPTION) else {
            invocation.reply(Self::overview(client, user, locale)).await?;
            return Ok(true);
        };

        let found = visible(client, user).find(|descriptor| descriptor.name() == name.trim());
        match found {
            Some(descriptor) => {
                invocation.reply(Self::details(client, descriptor, locale)).await?;
                Ok(true)
            }
            None => {
                invocation.reply(Self::unknown(client, name, locale)).await?;
                Ok(false)
            }
        }
    }

    async fn autocomplete(
        &self,
        invocation: &dyn AutocompleteInvocation,
        client: &CommandClient,
    ) -> Result<(), HandlerError> {
        let typed = invocation
            .focused()
            .map(|(_, value)| value.trim().to_lowercase())
            .unwrap_or_default();
        let locale = invocation.locale();

        let choices = visible(client, invocation.user().id)
            .filter(|descriptor| descriptor.name().starts_with(&typed))
            .take(MAX_AUTOCOMPLETE_CHOICES)
            .map(|descriptor| AutocompleteChoice {
                name: localized(descriptor, LocalizedField::Name, locale).to_string(),
                value: descriptor.name().to_string(),
            })
            .collect();

        invocation.respond(choices).await
    }

    fn has_autocomplete(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use crate::dispatcher::{Dispatcher, RunResult};
    use crate::interaction::BotIdentity;
    use crate::testing::{test_i18n, MockAutocomplete, MockInvocation, ScriptedHandler};
    use chatbridge_common::test_utils::discord_fixtures::{test_developer_id, test_user_id};

    fn client(extra: usize) -> CommandClient {
        let i18n = test_i18n();
        let mut client = CommandClient::new(
            ClientOptions {
                developer_ids: vec![test_developer_id()],
                support_server_url: Some("https://discord.gg/example".to_string()),
                ..ClientOptions::default()
            },
            i18n.clone(),
        )
        .unwrap();
        client.register(help_command(&i18n).unwrap()).unwrap();

        let status = CommandMetadata::new("status", "Show the server status", InstallScopes::BOTH, Contexts::All)
            .help_text("Pings the Minecraft server.")
            .cooldown(75);
        client
            .register(Command::chat_input(status, Vec::new(), ScriptedHandler::succeeding()).unwrap())
            .unwrap();

        let reload = CommandMetadata::new("reload", "Reload", InstallScopes::BOTH, Contexts::All).developer_only();
        client
            .register(Command::chat_input(reload, Vec::new(), ScriptedHandler::succeeding()).unwrap())
            .unwrap();

        for index in 0..extra {
            let metadata = CommandMetadata::new(format!("stat{index}"), "d", InstallScopes::BOTH, Contexts::All);
            client
                .register(Command::chat_input(metadata, Vec::new(), ScriptedHandler::succeeding()).unwrap())
                .unwrap();
        }

        client.set_identity(BotIdentity {
            id: UserId(77),
            name: "Bridge".to_string(),
            avatar_url: None,
        });
        client
    }

    #[test]
    fn test_help_metadata() {
        let i18n = test_i18n();
        let command = help_command(&i18n).unwrap();
        let descriptor = command.descriptor();

        assert_eq!(descriptor.name(), "help");
        assert_eq!(descriptor.cooldown_seconds(), 5);
        assert_eq!(descriptor.localized(LocalizedField::Name, "de"), Some("hilfe"));
        assert!(descriptor.options()[0].autocomplete);
        assert!(command.supports_autocomplete());
    }

    #[tokio::test]
    async fn test_overview_lists_visible_commands() {
        let client = client(0);
        let invocation = MockInvocation::new("help", test_user_id());

        assert_eq!(Dispatcher::new(&client).run(&invocation).await, Some(RunResult::Normal));

        let reply = &invocation.replies()[0];
        assert!(reply.ephemeral);
        let embed = &reply.embeds[0];
        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.fields[0].name, "General commands");
        let lines: Vec<&str> = embed.fields[0].value.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("help - "), "{}", lines[0]);
        assert_eq!(lines[1], "status - Show the server status");
        assert!(!embed.fields[0].value.contains("reload"));
        assert_eq!(reply.buttons.len(), 2);
        assert_eq!(reply.buttons[1].url, "https://discord.com/oauth2/authorize?client_id=77");
    }

    #[tokio::test]
    async fn test_developers_see_developer_commands() {
        let client = client(0);
        let invocation = MockInvocation::new("help", test_developer_id());
        Dispatcher::new(&client).run(&invocation).await;

        assert!(invocation.replies()[0].embeds[0].fields[0].value.contains("reload - Reload"));
    }

    #[tokio::test]
    async fn test_details() {
        let client = client(0);
        let invocation = MockInvocation::new("help", test_user_id()).with_option("command", "status");
        Dispatcher::new(&client).run(&invocation).await;

        let reply = &invocation.replies()[0];
        assert!(reply.ephemeral);
        let embed = &reply.embeds[0];
        assert_eq!(embed.title.as_deref(), Some("status"));
        assert_eq!(
            embed.description.as_deref(),
            Some("Show the server status\n\nPings the Minecraft server.")
        );
        assert_eq!(embed.fields[0].value, "General");
        assert_eq!(embed.fields[1].value, "1:15");
    }

    #[tokio::test]
    async fn test_unknown_command_skips_cooldown() {
        let client = client(0);
        let dispatcher = Dispatcher::new(&client);

        for _ in 0..2 {
            let invocation = MockInvocation::new("help", test_user_id()).with_option("command", "reload");
            assert_eq!(dispatcher.run(&invocation).await, Some(RunResult::Normal));
            let reply = &invocation.replies()[0];
            assert!(reply.ephemeral);
            assert_eq!(reply.embeds[0].title.as_deref(), Some("Unknown command"));
        }
        assert!(client.get("help").unwrap().cooldowns.is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_filters_by_prefix() {
        let client = client(0);
        let request = MockAutocomplete::new("help", "st");
        Dispatcher::new(&client).autocomplete(&request).await;

        let responses = request.responses();
        assert_eq!(
            responses[0],
            vec![AutocompleteChoice {
                name: "status".to_string(),
                value: "status".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_autocomplete_shows_localized_names() {
        let client = client(0);
        let request = MockAutocomplete::new("help", "he").with_locale("de");
        Dispatcher::new(&client).autocomplete(&request).await;

        assert_eq!(request.responses()[0][0].name, "hilfe");
        assert_eq!(request.responses()[0][0].value, "help");
    }

    #[tokio::test]
    async fn test_autocomplete_is_capped() {
        let client = client(40);
        let request = MockAutocomplete::new("help", "");
        Dispatcher::new(&client).autocomplete(&request).await;

        assert_eq!(request.responses()[0].len(), 25);
    }
}
