//! Command-line arguments

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "latest.log";

/// Relay Minecraft join/leave messages from a server log to a Discord channel.
///
/// The bot token and channel are read from `APP_TOKEN` and `CHANNEL_ID`.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// minecraft log file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub logfile: PathBuf,
}

impl Args {
    /// Parse arguments without exiting the process.
    ///
    /// On `--help`, `--version` or a usage error the message is printed and
    /// the exit status is returned instead (0 for help/version, 2 for errors).
    pub fn parse_or_status<I, T>(args: I) -> Result<Self, u8>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|err| {
            let _ = err.print();
            u8::try_from(err.exit_code()).unwrap_or(1)
        })
    }
}
