use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::cli::Args;
use crate::monitoring::ChannelId;

/// Environment variable holding the Discord bot token
pub const BOT_TOKEN_VAR: &str = "APP_TOKEN";
/// Environment variable holding the destination channel id
pub const CHANNEL_ID_VAR: &str = "CHANNEL_ID";

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub channel_id: ChannelId,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Load configuration from the process environment and parsed CLI arguments
    pub fn load(args: Args) -> Result<Self, ConfigError> {
        Self::from_lookup(args, |key| env::var(key).ok())
    }

    /// Build configuration with a custom variable lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(args: Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = required(&lookup, BOT_TOKEN_VAR)?;
        let channel_id = required(&lookup, CHANNEL_ID_VAR)?;

        Ok(Self {
            bot_token,
            channel_id: ChannelId::new(channel_id),
            log_file: args.logfile,
        })
    }
}

// Keep the token out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("log_file", &self.log_file)
            .finish()
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(key))
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("please set {0}")]
    MissingVar(&'static str),
}
