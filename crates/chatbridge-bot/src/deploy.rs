//! Command deployment over Discord's REST API.

use crate::error::BotResult;
use async_trait::async_trait;
use chatbridge_commands::{CommandSync, DeployScope, HandlerError};
use poise::serenity_prelude as serenity;
use serenity::{Command, CreateCommand, Http};
use std::sync::Arc;

/// Authenticated REST client with the application id set, usable before the
/// gateway connects.
pub async fn rest_client(token: &str) -> BotResult<Arc<Http>> {
    let http = Http::new(token);
    let application = http.get_current_application_info().await?;
    http.set_application_id(application.id);
    Ok(Arc::new(http))
}

/// [`CommandSync`] backed by serenity's bulk overwrite endpoints.
pub struct SerenityCommandSync {
    http: Arc<Http>,
}

impl SerenityCommandSync {
    /// Uses `http` for every request.
    pub const fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CommandSync for SerenityCommandSync {
    async fn replace_all(
        &self,
        scope: DeployScope,
        commands: Vec<CreateCommand>,
    ) -> Result<Vec<(String, u64)>, HandlerError> {
        let deployed = match scope {
            DeployScope::Guild(guild) => {
                serenity::GuildId::new(guild.get())
                    .set_commands(&self.http, commands)
                    .await?
            }
            DeployScope::Global => Command::set_global_commands(&self.http, commands).await?,
        };

        Ok(deployed
            .into_iter()
            .map(|command| (command.name, command.id.get()))
            .collect())
    }
}
