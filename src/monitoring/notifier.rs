//! Discord notifier
//!
//! Sends plain-text messages to a channel through the Discord bot HTTP API.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::utils::AppError;

/// Discord REST API base URL
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

const USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Destination channel identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something that can deliver a text message to a channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: &ChannelId, text: &str) -> Result<(), AppError>;
}

/// Create-message payload
#[derive(Debug, Serialize)]
pub struct DiscordMessage<'a> {
    pub content: &'a str,
}

/// Subset of the `GET /users/@me` response
#[derive(Debug, Deserialize)]
struct CurrentUser {
    id: String,
    username: String,
}

/// Authenticated Discord bot session
#[derive(Debug)]
pub struct DiscordNotifier {
    api_base: String,
    client: Client,
}

impl DiscordNotifier {
    /// Open a session against the public Discord API
    pub async fn connect(token: &str) -> Result<Self, AppError> {
        Self::connect_to(DISCORD_API_BASE, token).await
    }

    /// Open a session against `api_base`, verifying the bot token
    pub async fn connect_to(api_base: impl Into<String>, token: &str) -> Result<Self, AppError> {
        let session = Self::new(api_base, token)?;
        session.authenticate().await?;
        Ok(session)
    }

    fn new(api_base: impl Into<String>, token: &str) -> Result<Self, AppError> {
        let mut auth = HeaderValue::from_str(&format!("Bot {}", token))
            .map_err(|_| AppError::notifier_auth("bot token contains invalid characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::notifier_auth(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn authenticate(&self) -> Result<(), AppError> {
        let url = format!("{}/users/@me", self.api_base);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, "Failed to reach Discord");
            AppError::notifier_auth(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Discord rejected bot token");
            return Err(AppError::notifier_auth(format!("{} - {}", status, body)));
        }

        let user: CurrentUser = response
            .json()
            .await
            .map_err(|e| AppError::notifier_auth(format!("unexpected /users/@me response: {}", e)))?;

        info!(bot_id = %user.id, bot = %user.username, "Discord session established");
        Ok(())
    }

    /// Release the session. Called once at shutdown.
    pub fn close(self) {
        debug!("Discord session closed");
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    #[instrument(skip_all, fields(channel = %destination))]
    async fn send(&self, destination: &ChannelId, text: &str) -> Result<(), AppError> {
        let url = format!("{}/channels/{}/messages", self.api_base, destination);
        let payload = DiscordMessage { content: text };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send Discord message");
                AppError::send_failed(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Discord returned error");
            return Err(AppError::send_failed(format!("{} - {}", status, body)));
        }

        debug!("Discord message sent");
        Ok(())
    }
}
