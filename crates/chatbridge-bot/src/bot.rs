//! Startup sequence and gateway login.

use crate::args::Args;
use crate::deploy::{rest_client, SerenityCommandSync};
use crate::error::BotResult;
use crate::events::{bot_identity, event_handler, on_error, Data, HANDLED_EVENTS};
use crate::relay::{ChatRelay, Console, RconConsole};
use chatbridge_commands::{
    deploy_commands, help_command, remove_all_commands, ClientOptions, Command, CommandClient, CommandError,
    DeployScope,
};
use chatbridge_common::{first_line, log_wrapped, report_error, LogTag};
use chatbridge_config::Config;
use chatbridge_i18n::I18n;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// How often expired cooldowns are swept.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Every command the bot ships with.
pub fn command_set(i18n: &I18n) -> Result<Vec<Command>, CommandError> {
    Ok(vec![help_command(i18n)?])
}

/// Logs panics. Outside of dry runs the process exits with status 1
/// afterwards.
pub fn install_panic_hook(dry_run: bool) {
    std::panic::set_hook(Box::new(move |info| {
        error!(tag = "error", "{}", first_line(&info.to_string()));
        if !dry_run {
            std::process::exit(1);
        }
    }));
}

/// Sweeps expired cooldowns every [`PURGE_INTERVAL`].
pub fn spawn_purge_task(client: Arc<CommandClient>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = client.purge_expired();
            if purged > 0 {
                debug!(tag = "debug", "Purged {purged} expired cooldowns");
            }
        }
    })
}

/// The bot process.
pub struct ChatBridge {
    args: Args,
    config: Config,
}

impl ChatBridge {
    /// Creates a new bot instance.
    pub const fn new(args: Args, config: Config) -> Self {
        Self { args, config }
    }

    /// Runs every startup step and, unless this is a dry run, stays connected
    /// to Discord until shut down.
    pub async fn run(self) -> BotResult<()> {
        let dev = self.config.discord.dev_mode;
        info!(tag = "setup", "Developer mode is {}", if dev { "ON" } else { "OFF" });

        info!(tag = "setup", "Setting up i18n...");
        let i18n = Arc::new(I18n::load_dir(&self.config.i18n.locales_dir)?);

        let console = self.connect_console().await?;

        info!(tag = "setup", "Setting up Discord client");
        let mut client = CommandClient::new(ClientOptions::from(&self.config.commands), Arc::clone(&i18n))?;
        let sync = SerenityCommandSync::new(rest_client(&self.config.discord.token).await?);
        let scope = DeployScope::for_mode(dev, self.config.discord.dev_guild_id);

        if self.args.empty_deploy {
            info!(tag = "client", layer = 1, "Removing all deployed commands...");
            remove_all_commands(&sync, scope).await?;
            info!(tag = "process", layer = 1, "Running without any commands is pointless, exiting...");
            if let Some(console) = &console {
                console.close().await;
            }
            return Ok(());
        }

        info!(tag = "client", layer = 1, "Setting up commands");
        for command in command_set(&i18n)? {
            client.register(command)?;
        }

        if self.args.skip_deploy {
            info!(
                tag = "client",
                layer = 1,
                "Skipped refreshing API commands, no command IDs will be gathered!"
            );
            log_wrapped(
                LogTag::Warn,
                1,
                "If the previous run did not deploy any commands, you could be running without commands now. Unknown things might happen!",
            );
            log_wrapped(LogTag::Warn, 1, "If that's not the case, you can ignore this message.");
        } else {
            info!(tag = "client", layer = 1, "Refreshing API commands");
            deploy_commands(&client, &sync, scope).await?;
        }

        let client = Arc::new(client);
        let relay = self.relay(console.clone());

        info!(tag = "events", "Setting up Discord events");
        for event in HANDLED_EVENTS {
            info!(tag = "events", layer = 1, "Imported & Loaded {event}");
        }

        if self.args.dry_run {
            info!(tag = "client", "Logging in... (DRY RUN)");
            if let Some(console) = &console {
                console.close().await;
            }
            return Ok(());
        }

        info!(tag = "client", "Logging in...");
        self.login(client, relay, console).await
    }

    async fn connect_console(&self) -> BotResult<Option<Arc<dyn Console>>> {
        let minecraft = &self.config.minecraft;
        let Some(password) = &minecraft.rcon_password else {
            warn!(tag = "warn", "MINECRAFT_RCON_PASSWORD is not set, the chat relay is disabled");
            return Ok(None);
        };

        match RconConsole::connect(minecraft, password).await {
            Ok(console) => {
                let console: Arc<dyn Console> = Arc::new(console);
                Ok(Some(console))
            }
            Err(err) if self.args.dry_run => {
                warn!(tag = "warn", "Couldn't connect to RCON at {}", minecraft.rcon_address());
                report_error(&err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn relay(&self, console: Option<Arc<dyn Console>>) -> Option<Arc<ChatRelay>> {
        let console = console?;
        let Some(channel) = self.config.minecraft.relay_channel_id else {
            warn!(tag = "warn", "RELAY_CHANNEL_ID is not set, the chat relay is disabled");
            return None;
        };

        info!(tag = "process", "Relaying chat from channel {channel} to Minecraft");
        Some(Arc::new(ChatRelay::new(channel, console)))
    }

    async fn login(
        &self,
        client: Arc<CommandClient>,
        relay: Option<Arc<ChatRelay>>,
        console: Option<Arc<dyn Console>>,
    ) -> BotResult<()> {
        let intents = serenity::GatewayIntents::GUILDS
            | serenity::GatewayIntents::GUILD_MESSAGES
            | serenity::GatewayIntents::MESSAGE_CONTENT
            | serenity::GatewayIntents::GUILD_MEMBERS;

        let data = Data {
            client: Arc::clone(&client),
            relay,
        };

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                on_error: |error| Box::pin(on_error(error)),
                event_handler: |ctx, event, framework, data| Box::pin(event_handler(ctx, event, framework, data)),
                ..Default::default()
            })
            .setup(move |_ctx, ready, _framework| {
                data.client.set_identity(bot_identity(&ready.user));
                Box::pin(async move { Ok(data) })
            })
            .build();

        let mut discord = serenity::ClientBuilder::new(&self.config.discord.token, intents)
            .framework(framework)
            .await?;

        spawn_purge_task(client);

        let shard_manager = discord.shard_manager.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(tag = "error", "Failed to listen for shutdown signal: {err}");
                return;
            }

            info!(tag = "process", "Received shutdown signal, starting graceful shutdown");
            if let Some(console) = console {
                console.close().await;
            }
            shard_manager.shutdown_all().await;
        });

        discord.start().await?;
        Ok(())
    }
}
