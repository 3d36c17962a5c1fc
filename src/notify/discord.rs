//! # notify::discord
//!
//! Sends messages through the Discord REST API as a bot:
//! `POST {api_base}/channels/{channel_id}/messages`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, info};

use super::{Message, Notifier, NotifyError};
use crate::config::Config;

pub struct DiscordNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
    channel_id: u64,
}

impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("api_base", &self.api_base)
            .field("channel_id", &self.channel_id)
            .finish_non_exhaustive()
    }
}

impl DiscordNotifier {
    pub fn new(api_base: &str, token: &str, channel_id: u64) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            channel_id,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        Self::new(&config.discord_api_base, &config.discord_token, config.channel_id)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let url = format!("{}/channels/{}/messages", self.api_base, self.channel_id);
        debug!(channel_id = self.channel_id, "Sending Discord message");

        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bot {}", self.token))
            .json(message)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }

        info!(channel_id = self.channel_id, "Discord message delivered ✅");
        Ok(())
    }
}
