use std::path::PathBuf;

use crate::config::ConfigError;

/// Application-wide error type
///
/// Every variant is fatal: `main` logs it once and exits non-zero.
/// Unreadable log lines are not errors here, the watch loop only warns about them.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open {} for tailing: {source}", .path.display())]
    TailOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("could not create discord session: {0}")]
    NotifierAuth(String),

    #[error("failed to send discord message: {0}")]
    Send(String),
}

impl AppError {
    pub fn tail_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::TailOpen {
            path: path.into(),
            source,
        }
    }

    pub fn notifier_auth(msg: impl Into<String>) -> Self {
        AppError::NotifierAuth(msg.into())
    }

    pub fn send_failed(msg: impl Into<String>) -> Self {
        AppError::Send(msg.into())
    }
}
