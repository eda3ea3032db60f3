pub mod cli;
pub mod config;
pub mod monitoring;
pub mod utils;

use config::AppConfig;
use monitoring::{DiscordNotifier, LogTail, LogWatcher};
use utils::AppError;

/// Tail the configured log file and relay join/leave messages until the tail closes.
///
/// The log file is opened before the Discord session, so a missing file fails
/// without any network traffic. Once created, the session is closed on every path.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let watcher = LogWatcher::new()?;
    let mut tail = LogTail::open(&config.log_file).await?;

    let notifier = DiscordNotifier::connect(&config.bot_token).await?;
    let result = watcher
        .watch(&mut tail, &notifier, &config.channel_id)
        .await;
    notifier.close();

    result
}
