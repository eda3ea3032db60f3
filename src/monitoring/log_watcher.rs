//! Join/leave watcher for Minecraft server logs
//!
//! Matches lines such as `[12:00:01] [Server thread/INFO]: Steve joined the game`
//! and relays `Steve joined the game` to the configured channel.

use std::fmt;

use regex::Regex;
use tracing::{info, instrument, warn};

use super::notifier::{ChannelId, Notifier};
use super::tail::LineSource;
use crate::utils::AppError;

// ASCII whitespace after the colon; player names are ASCII word characters.
const LOGIN_PATTERN: &str = r".*:[\t\n\f\r ]([0-9A-Za-z_]+) joined the game";
const LOGOUT_PATTERN: &str = r".*:[\t\n\f\r ]([0-9A-Za-z_]+) left the game";

/// Player activity found in a log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Joined { name: String },
    Left { name: String },
}

impl PlayerEvent {
    pub fn name(&self) -> &str {
        match self {
            PlayerEvent::Joined { name } | PlayerEvent::Left { name } => name,
        }
    }
}

/// Notification text for the event
impl fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerEvent::Joined { name } => write!(f, "{} joined the game", name),
            PlayerEvent::Left { name } => write!(f, "{} left the game", name),
        }
    }
}

/// Log watcher that turns join/leave lines into notifications
#[derive(Debug, Clone)]
pub struct LogWatcher {
    login: Regex,
    logout: Regex,
}

impl LogWatcher {
    /// Compile the join and leave patterns
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            login: Regex::new(LOGIN_PATTERN)?,
            logout: Regex::new(LOGOUT_PATTERN)?,
        })
    }

    /// Find the player events in a line.
    ///
    /// Both patterns are always tried, join first. An empty result means the
    /// line is not a join or leave message.
    pub fn classify(&self, text: &str) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if let Some(name) = capture_name(&self.login, text) {
            events.push(PlayerEvent::Joined { name });
        }
        if let Some(name) = capture_name(&self.logout, text) {
            events.push(PlayerEvent::Left { name });
        }

        events
    }

    /// Relay every join/leave line from `source` to `destination`.
    ///
    /// Returns `Ok(())` once the source closes. A failed send stops the watch
    /// and is returned as-is; no later line is read.
    #[instrument(skip_all, fields(channel = %destination))]
    pub async fn watch<S, N>(
        &self,
        source: &mut S,
        notifier: &N,
        destination: &ChannelId,
    ) -> Result<(), AppError>
    where
        S: LineSource + ?Sized,
        N: Notifier + ?Sized,
    {
        info!(filename = %source.label(), "starting tail");

        while let Some(line) = source.next_line().await {
            if let Some(err) = &line.error {
                warn!(filename = %source.label(), error = %err, "failed to tail line");
                continue;
            }

            for event in self.classify(&line.text) {
                let message = event.to_string();
                info!(player = %event.name(), "{}", message);
                notifier.send(destination, &message).await?;
            }
        }

        info!(filename = %source.label(), "tailing complete");
        Ok(())
    }
}

fn capture_name(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
