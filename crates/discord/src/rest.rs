//! Outbound delivery of bot replies over the Discord REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info};

use crate::events::OutboundMessage;

pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to build discord http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("discord request to `{url}` failed: {message}")]
    Transport { url: String, message: String },
    #[error("discord rejected message for channel `{channel_id}` with status {status}: {body}")]
    Status { channel_id: String, status: u16, body: String },
}

#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, outbound: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Logs replies instead of posting them; used when no gateway is wired.
#[derive(Default)]
pub struct NoopMessageSink;

#[async_trait]
impl MessageSink for NoopMessageSink {
    async fn send(&self, outbound: &OutboundMessage) -> Result<(), DeliveryError> {
        info!(
            event_name = "egress.discord.message_skipped",
            channel_id = %outbound.channel_id,
            preview = %outbound.message.fallback_text(),
            "noop sink dropped outbound message"
        );
        Ok(())
    }
}

pub struct DiscordRestSink {
    client: Client,
    api_base_url: String,
    bot_token: SecretString,
}

impl DiscordRestSink {
    pub fn new(
        api_base_url: impl Into<String>,
        bot_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(timeout).build().map_err(DeliveryError::Build)?;
        Ok(Self::with_http_client(client, api_base_url, bot_token))
    }

    pub fn with_http_client(
        client: Client,
        api_base_url: impl Into<String>,
        bot_token: SecretString,
    ) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_owned();
        Self { client, api_base_url, bot_token }
    }

    pub fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{channel_id}/messages", self.api_base_url)
    }
}

#[async_trait]
impl MessageSink for DiscordRestSink {
    async fn send(&self, outbound: &OutboundMessage) -> Result<(), DeliveryError> {
        let url = self.messages_url(&outbound.channel_id);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bot {}", self.bot_token.expose_secret()))
            .json(&outbound.message)
            .send()
            .await
            .map_err(|error| DeliveryError::Transport {
                url: url.clone(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                channel_id: outbound.channel_id.clone(),
                status: status.as_u16(),
                body,
            });
        }

        debug!(
            event_name = "egress.discord.message_sent",
            channel_id = %outbound.channel_id,
            status = status.as_u16(),
            "posted message to discord channel"
        );
        Ok(())
    }
}
