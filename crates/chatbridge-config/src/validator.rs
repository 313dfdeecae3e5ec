//! Cross-field validation.

use crate::error::ConfigError;
use crate::schema::Config;

impl Config {
    /// Checks the rules that involve more than one variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if !self.commands.allow_guild_installed && !self.commands.allow_user_installed {
            problems.push(ConfigError::Validation(
                "at least one of guild or user installed commands must be allowed".to_string(),
            ));
        }

        if self.minecraft.rcon_port == 0 {
            problems.push(ConfigError::Validation("RCON port must not be 0".to_string()));
        }

        if let Some(url) = &self.commands.support_server_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                problems.push(ConfigError::Validation(format!(
                    "support server URL must be an http(s) link, got '{url}'"
                )));
            }
        }

        ConfigError::from_list(problems).map_or(Ok(()), Err)
    }
}
