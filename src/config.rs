//! Process configuration.
//!
//! Every setting can come from a flag or from the environment. `main` loads a
//! `.env` file first, so a local `.env` behaves like exported variables.

use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;

use crate::discord::DEFAULT_API_BASE;
use crate::types::ChannelId;

/// Errors found while validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("forum channel id must be a numeric snowflake, got {0:?}")]
    InvalidForumChannel(String),

    #[error("webhook secret must not be empty")]
    EmptyWebhookSecret,

    #[error("Discord bot token must not be empty")]
    EmptyBotToken,
}

#[derive(Parser, Clone)]
#[command(name = "forum-relay")]
#[command(about = "Relays GitHub issue and pull request activity into Discord forum threads")]
pub struct Config {
    /// Discord forum channel that receives the threads
    #[arg(long, env = "FORUM_CHANNEL_ID")]
    pub forum_channel_id: String,

    /// Discord bot token
    #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
    pub discord_bot_token: String,

    /// Shared secret configured on the GitHub webhook
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Discord REST API base URL
    #[arg(long, env = "DISCORD_API_BASE", default_value = DEFAULT_API_BASE)]
    pub discord_api_base: String,
}

impl Config {
    /// Checks what clap cannot: non-empty credentials and a numeric channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.forum_channel().is_snowflake() {
            return Err(ConfigError::InvalidForumChannel(
                self.forum_channel_id.clone(),
            ));
        }
        if self.webhook_secret.is_empty() {
            return Err(ConfigError::EmptyWebhookSecret);
        }
        if self.discord_bot_token.trim().is_empty() {
            return Err(ConfigError::EmptyBotToken);
        }
        Ok(())
    }

    pub fn forum_channel(&self) -> ChannelId {
        ChannelId::new(self.forum_channel_id.trim())
    }
}

// Secrets stay out of logs and panics.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("forum_channel_id", &self.forum_channel_id)
            .field("discord_bot_token", &"<redacted>")
            .field("webhook_secret", &"<redacted>")
            .field("listen", &self.listen)
            .field("discord_api_base", &self.discord_api_base)
            .finish()
    }
}
