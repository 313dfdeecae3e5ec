//! Runs one interaction through the developer gate, the cooldown gate and
//! the handler, then settles the cooldown and logs the use.

use crate::client::CommandClient;
use crate::cooldown::{CooldownKind, ExecutionOutcome, Gate};
use crate::interaction::{AutocompleteInvocation, CommandInvocation};
use crate::registry::RegisteredCommand;
use crate::reply::{emb, EmbedKind, Reply};
use chatbridge_common::report_error;
use chatbridge_i18n::fluent_args;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, error, info, warn};

/// How a dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunResult {
    /// The handler finished.
    Normal,
    /// The handler failed.
    Errored,
    /// The user was still on cooldown.
    OnCooldown,
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Errored => "errored",
            Self::OnCooldown => "onCooldown",
        })
    }
}

/// Dispatches interactions against a [`CommandClient`].
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    client: &'a CommandClient,
}

impl<'a> Dispatcher<'a> {
    /// A dispatcher over `client`.
    pub const fn new(client: &'a CommandClient) -> Self {
        Self { client }
    }

    /// Runs a command interaction.
    ///
    /// Returns `None` when the command is unknown or the user may not run it.
    /// Both cases still answer the user with an ephemeral error.
    /// Handler errors are reported and answered here, never returned.
    pub async fn run(&self, invocation: &dyn CommandInvocation) -> Option<RunResult> {
        let Some(entry) = self.client.get(invocation.command_name()) else {
            warn!(tag = "warn", "Received unknown command '{}'", invocation.command_name());
            let message = self.client.i18n().t("command-error", invocation.locale(), None);
            self.send(invocation, Reply::embed(emb(EmbedKind::Error, message)).ephemeral())
                .await;
            return None;
        };
        let descriptor = entry.command.descriptor();
        let user = invocation.user();

        if descriptor.developer_only() && !self.client.is_developer(user.id) {
            info!(
                tag = "commands",
                "{} ({}) tried to use developer command {} but is not a developer.",
                user.name,
                user.id,
                descriptor.log_name()
            );
            let message = self.client.i18n().t("command-dev-only-warning", invocation.locale(), None);
            self.send(invocation, Reply::embed(emb(EmbedKind::Error, message)).ephemeral())
                .await;
            return None;
        }

        let windows = self.client.windows_for(descriptor);
        let result = match entry.cooldowns.check(user.id, self.client.now(), windows) {
            Gate::Closed { kind, expires_at, .. } => {
                self.reject(invocation, entry, kind, expires_at).await;
                RunResult::OnCooldown
            }
            Gate::Open => {
                let outcome = self.execute(invocation, entry).await;
                entry
                    .cooldowns
                    .record(user.id, outcome, self.client.now(), descriptor.developer_only(), windows);

                if outcome == ExecutionOutcome::Failed {
                    RunResult::Errored
                } else {
                    RunResult::Normal
                }
            }
        };

        if self.client.options().log_command_uses {
            info!(
                tag = "commands",
                "{} ({}) used {} with result: {result}",
                user.name,
                user.id,
                descriptor.log_name()
            );
        }

        Some(result)
    }

    async fn execute(&self, invocation: &dyn CommandInvocation, entry: &RegisteredCommand) -> ExecutionOutcome {
        let descriptor = entry.command.descriptor();

        match entry.command.handler().execute(invocation, self.client).await {
            Ok(true) => ExecutionOutcome::Ran,
            Ok(false) => ExecutionOutcome::Skipped,
            Err(err) => {
                error!(tag = "error", "Error while running {}", descriptor.log_name());
                report_error(&*err);

                let message = self.client.i18n().t("command-error", invocation.locale(), None);
                let reply = Reply::embed(emb(EmbedKind::Error, message)).ephemeral();
                let sent = if invocation.has_responded() {
                    invocation.edit_reply(reply).await
                } else {
                    invocation.reply(reply).await
                };
                if let Err(err) = sent {
                    warn!(tag = "warn", "Couldn't send the error message: {err}");
                }

                ExecutionOutcome::Failed
            }
        }
    }

    async fn reject(
        &self,
        invocation: &dyn CommandInvocation,
        entry: &RegisteredCommand,
        kind: CooldownKind,
        expires_at: DateTime<Utc>,
    ) {
        let time = format!("<t:{}:R>", expires_at.timestamp());
        let command_name = entry.command.descriptor().mention();
        let locale = invocation.locale();
        let i18n = self.client.i18n();

        let message = match kind {
            CooldownKind::Normal => {
                let args = fluent_args!("time" => time, "commandName" => command_name);
                i18n.t("command-cooldown-normal", locale, args.as_ref())
            }
            CooldownKind::Errored => {
                let support_server = self
                    .client
                    .options()
                    .support_server_url
                    .clone()
                    .unwrap_or_else(|| "none".to_string());
                let args = fluent_args!(
                    "time" => time,
                    "commandName" => command_name,
                    "supportServer" => support_server,
                );
                i18n.t("command-cooldown-error", locale, args.as_ref())
            }
        };

        self.send(invocation, Reply::embed(emb(EmbedKind::Error, message)).ephemeral())
            .await;
    }

    async fn send(&self, invocation: &dyn CommandInvocation, reply: Reply) {
        if let Err(err) = invocation.reply(reply).await {
            warn!(tag = "warn", "Couldn't reply to {}: {err}", invocation.command_name());
        }
    }

    /// Routes an autocomplete request to a command that supports it.
    pub async fn autocomplete(&self, invocation: &dyn AutocompleteInvocation) {
        let Some(entry) = self.client.get(invocation.command_name()) else {
            debug!(tag = "debug", "Autocomplete for unknown command '{}'", invocation.command_name());
            return;
        };

        if !entry.command.supports_autocomplete() {
            debug!(
                tag = "debug",
                "{} doesn't support autocomplete",
                entry.command.descriptor().log_name()
            );
            return;
        }

        if let Err(err) = entry.command.handler().autocomplete(invocation, self.client).await {
            error!(
                tag = "error",
                "Autocomplete failed for {}",
                entry.command.descriptor().log_name()
            );
            report_error(&*err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientOptions;
    use crate::cooldown::{CooldownKind, ManualClock};
    use crate::descriptor::{CommandMetadata, Contexts, InstallScopes};
    use crate::handler::Command;
    use crate::testing::{at, t0, test_i18n, MockAutocomplete, MockInvocation, ScriptedHandler};
    use chatbridge_common::test_utils::discord_fixtures::{test_developer_id, test_user_id};
    use std::sync::Arc;

    struct Harness {
        client: CommandClient,
        clock: Arc<ManualClock>,
    }

    fn harness(handlers: Vec<(CommandMetadata, ScriptedHandler)>, options: ClientOptions) -> Harness {
        let clock = Arc::new(ManualClock::new(t0()));
        let mut client = CommandClient::new(options, test_i18n())
            .unwrap()
            .with_clock(clock.clone());
        for (metadata, handler) in handlers {
            client
                .register(Command::chat_input(metadata, Vec::new(), handler).unwrap())
                .unwrap();
        }
        Harness { client, clock }
    }

    fn ping(cooldown: u64) -> CommandMetadata {
        CommandMetadata::new("ping", "Ping", InstallScopes::BOTH, Contexts::All).cooldown(cooldown)
    }

    fn developer_options() -> ClientOptions {
        ClientOptions {
            developer_ids: vec![test_developer_id()],
            ..ClientOptions::default()
        }
    }

    #[tokio::test]
    async fn test_cooldown_blocks_within_window() {
        let handler = ScriptedHandler::succeeding();
        let calls = handler.calls();
        let h = harness(vec![(ping(5), handler)], ClientOptions::default());
        let dispatcher = Dispatcher::new(&h.client);

        let first = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&first).await, Some(RunResult::Normal));

        h.clock.set(at(3));
        let second = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&second).await, Some(RunResult::OnCooldown));
        let replies = second.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].ephemeral);
        let text = replies[0].embeds[0].description.clone().unwrap();
        assert!(text.contains(&format!("<t:{}:R>", at(5).timestamp())), "{text}");

        h.clock.set(at(6));
        let third = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&third).await, Some(RunResult::Normal));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_skip_signal_leaves_no_record() {
        let handler = ScriptedHandler::skipping();
        let h = harness(vec![(ping(5), handler)], ClientOptions::default());
        let dispatcher = Dispatcher::new(&h.client);

        for _ in 0..3 {
            let invocation = MockInvocation::new("ping", test_user_id());
            assert_eq!(dispatcher.run(&invocation).await, Some(RunResult::Normal));
        }
        assert!(h.client.get("ping").unwrap().cooldowns.is_empty());
    }

    #[tokio::test]
    async fn test_failure_replies_once_and_applies_error_window() {
        let handler = ScriptedHandler::failing();
        let h = harness(
            vec![(ping(5), handler)],
            ClientOptions {
                support_server_url: Some("https://discord.gg/example".to_string()),
                ..ClientOptions::default()
            },
        );
        let dispatcher = Dispatcher::new(&h.client);

        let first = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&first).await, Some(RunResult::Errored));
        assert_eq!(first.replies().len(), 1);
        assert!(first.edits().is_empty());
        assert_eq!(
            first.replies()[0].embeds[0].description.as_deref(),
            Some("An error occurred while executing this command. Please try again later.")
        );

        h.clock.set(at(30));
        let second = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&second).await, Some(RunResult::OnCooldown));
        let text = second.replies()[0].embeds[0].description.clone().unwrap();
        assert!(text.starts_with("This command failed the last time"), "{text}");
        assert!(text.contains("https://discord.gg/example"), "{text}");
        assert_eq!(
            h.client.get("ping").unwrap().cooldowns.get(test_user_id()).map(|r| r.kind),
            Some(CooldownKind::Errored)
        );

        h.clock.set(at(61));
        let third = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&third).await, Some(RunResult::Errored));
    }

    #[tokio::test]
    async fn test_error_cooldown_without_support_server() {
        let h = harness(vec![(ping(5), ScriptedHandler::failing())], ClientOptions::default());
        let dispatcher = Dispatcher::new(&h.client);

        dispatcher.run(&MockInvocation::new("ping", test_user_id())).await;
        let second = MockInvocation::new("ping", test_user_id());
        dispatcher.run(&second).await;

        let text = second.replies()[0].embeds[0].description.clone().unwrap();
        assert!(text.ends_with(&format!("<t:{}:R>.", at(60).timestamp())), "{text}");
    }

    #[tokio::test]
    async fn test_failure_after_reply_edits_instead() {
        let h = harness(vec![(ping(5), ScriptedHandler::failing_after_reply())], ClientOptions::default());
        let dispatcher = Dispatcher::new(&h.client);

        let invocation = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&invocation).await, Some(RunResult::Errored));
        assert_eq!(invocation.replies().len(), 1);
        assert_eq!(invocation.edits().len(), 1);
    }

    #[tokio::test]
    async fn test_developer_gate_short_circuits() {
        let handler = ScriptedHandler::succeeding();
        let calls = handler.calls();
        let h = harness(vec![(ping(5).developer_only(), handler)], developer_options());
        let dispatcher = Dispatcher::new(&h.client);

        let outsider = MockInvocation::new("ping", test_user_id());
        assert_eq!(dispatcher.run(&outsider).await, None);
        assert_eq!(calls.get(), 0);
        assert_eq!(
            outsider.replies()[0].embeds[0].description.as_deref(),
            Some("This command is only available to the developers of this bot.")
        );
        assert!(h.client.get("ping").unwrap().cooldowns.is_empty());
    }

    #[tokio::test]
    async fn test_developers_bypass_cooldown() {
        let handler = ScriptedHandler::succeeding();
        let calls = handler.calls();
        let h = harness(vec![(ping(5).developer_only(), handler)], developer_options());
        let dispatcher = Dispatcher::new(&h.client);

        for _ in 0..3 {
            let invocation = MockInvocation::new("ping", test_developer_id());
            assert_eq!(dispatcher.run(&invocation).await, Some(RunResult::Normal));
        }
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let h = harness(Vec::new(), ClientOptions::default());
        let invocation = MockInvocation::new("nope", test_user_id());
        assert_eq!(Dispatcher::new(&h.client).run(&invocation).await, None);

        let replies = invocation.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].ephemeral);
        assert_eq!(
            replies[0].embeds[0].description.as_deref(),
            Some("An error occurred while executing this command. Please try again later.")
        );
    }

    #[tokio::test]
    async fn test_localized_cooldown_reply() {
        let h = harness(vec![(ping(5), ScriptedHandler::succeeding())], ClientOptions::default());
        let dispatcher = Dispatcher::new(&h.client);

        dispatcher.run(&MockInvocation::new("ping", test_user_id())).await;
        let german = MockInvocation::new("ping", test_user_id()).with_locale("de");
        dispatcher.run(&german).await;

        let text = german.replies()[0].embeds[0].description.clone().unwrap();
        assert!(!text.starts_with("You are using"), "{text}");
    }

    #[tokio::test]
    async fn test_autocomplete_requires_capability() {
        let h = harness(vec![(ping(5), ScriptedHandler::succeeding())], ClientOptions::default());
        let request = MockAutocomplete::new("ping", "");
        Dispatcher::new(&h.client).autocomplete(&request).await;
        assert!(request.responses().is_empty());
    }

    #[test]
    fn test_run_result_display() {
        assert_eq!(RunResult::Normal.to_string(), "normal");
        assert_eq!(RunResult::Errored.to_string(), "errored");
        assert_eq!(RunResult::OnCooldown.to_string(), "onCooldown");
    }
}
