use std::process::ExitCode;

use mclog_notifier::{cli::Args, config::AppConfig, utils::init_logging, utils::AppError};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load .env
    dotenvy::dotenv().ok();

    // 2. Logging; the guard flushes on return
    let _log_guard = init_logging();

    // 3. Arguments; usage errors return through the guard too
    let args = match Args::parse_or_status(std::env::args_os()) {
        Ok(args) => args,
        Err(status) => return ExitCode::from(status),
    };

    // 4. Run until the tail closes or something fatal happens
    match start(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal error, exiting");
            ExitCode::FAILURE
        }
    }
}

async fn start(args: Args) -> Result<(), AppError> {
    let config = AppConfig::load(args)?;
    tracing::debug!(config = ?config, "Configuration loaded");

    mclog_notifier::run(config).await
}
