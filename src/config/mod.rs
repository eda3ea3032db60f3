pub mod app_config;

pub use app_config::{AppConfig, ConfigError, BOT_TOKEN_VAR, CHANNEL_ID_VAR};
