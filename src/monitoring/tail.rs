//! Live tail of a log file
//!
//! Wraps [`linemux`], which follows appended writes, reopens the file after
//! rotation or truncation, and starts reading existing files at their end.
//!
//! linemux only reacts to file events while it is polled, so a background task
//! owns it and forwards lines over a channel. Rotation is picked up even while
//! the consumer is busy sending a notification.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use linemux::MuxedLines;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::utils::AppError;

/// One line read from the tail source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Line text without the trailing newline
    pub text: String,
    /// Set when the source failed to read this line
    pub error: Option<String>,
}

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            error: Some(error.into()),
        }
    }
}

/// A live sequence of log lines
///
/// `None` means the stream has closed.
#[async_trait(?Send)]
pub trait LineSource {
    /// Wait for the next line
    async fn next_line(&mut self) -> Option<LogLine>;

    /// Human-readable name of what is being read, used in log output
    fn label(&self) -> &str;
}

/// Tail of a single log file
pub struct LogTail {
    label: String,
    lines: mpsc::UnboundedReceiver<LogLine>,
    forwarder: JoinHandle<()>,
}

impl LogTail {
    /// Open a tail on `path`, positioned at the current end of the file.
    ///
    /// The file must already exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path: PathBuf = path.as_ref().to_path_buf();

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AppError::tail_open(&path, e))?;
        if !metadata.is_file() {
            return Err(AppError::tail_open(
                &path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        // linemux defers opening, so surface permission errors now.
        tokio::fs::File::open(&path)
            .await
            .map_err(|e| AppError::tail_open(&path, e))?;

        let mut lines = MuxedLines::new().map_err(|e| AppError::tail_open(&path, e))?;
        lines
            .add_file(path.clone())
            .await
            .map_err(|e| AppError::tail_open(&path, e))?;

        // Unbounded so the forwarder never stops polling linemux.
        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = tokio::spawn(forward_lines(lines, tx));

        debug!(filename = %path.display(), "Tail opened");

        Ok(Self {
            label: path.display().to_string(),
            lines: rx,
            forwarder,
        })
    }
}

impl Drop for LogTail {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

async fn forward_lines(mut lines: MuxedLines, tx: mpsc::UnboundedSender<LogLine>) {
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => LogLine::new(line.line()),
            Ok(None) => break,
            Err(e) => LogLine::failed(e.to_string()),
        };
        if tx.send(line).is_err() {
            break;
        }
    }
    debug!("Tail forwarder stopped");
}

#[async_trait(?Send)]
impl LineSource for LogTail {
    async fn next_line(&mut self) -> Option<LogLine> {
        self.lines.recv().await
    }

    fn label(&self) -> &str {
        &self.label
    }
}
