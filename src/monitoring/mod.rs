//! Minecraft log monitoring
//!
//! - Tailing the server log (`tail`)
//! - Matching join/leave lines (`log_watcher`)
//! - Relaying messages to a Discord channel (`notifier`)

pub mod log_watcher;
pub mod notifier;
pub mod tail;

pub use log_watcher::{LogWatcher, PlayerEvent};
pub use notifier::{ChannelId, DiscordNotifier, Notifier};
pub use tail::{LineSource, LogLine, LogTail};
