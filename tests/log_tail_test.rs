/// Tailing a real log file and the startup failure paths of `run`
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use mclog_notifier::cli::Args;
use mclog_notifier::config::{AppConfig, ConfigError};
use mclog_notifier::monitoring::{LineSource, LogTail, LogWatcher, PlayerEvent};
use mclog_notifier::utils::AppError;

const READ_TIMEOUT: Duration = Duration::from_secs(10);

fn append_line(path: &PathBuf, line: &str) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .expect("open for append");
    writeln!(file, "{}", line).expect("append");
    file.flush().expect("flush");
}

#[tokio::test]
async fn should_only_read_lines_appended_after_open() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("latest.log");
    std::fs::write(&path, "X: A joined the game\n").expect("write");

    let mut tail = LogTail::open(&path).await.expect("open tail");

    // Act
    append_line(&path, "X: B left the game");
    let line = tokio::time::timeout(READ_TIMEOUT, tail.next_line())
        .await
        .expect("line within timeout")
        .expect("stream open");

    // Assert
    assert!(line.error.is_none());
    assert_eq!(line.text, "X: B left the game");

    let events = LogWatcher::new().expect("patterns").classify(&line.text);
    assert_eq!(
        events,
        vec![PlayerEvent::Left {
            name: "B".to_string()
        }]
    );
}

#[tokio::test]
async fn should_read_appended_lines_in_order() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("latest.log");
    std::fs::write(&path, "").expect("write");

    let mut tail = LogTail::open(&path).await.expect("open tail");

    // Act
    append_line(&path, "[12:00:01] [Server thread/INFO]: Steve joined the game");
    append_line(&path, "[12:00:02] [Server thread/INFO]: Steve left the game");

    let mut texts = Vec::new();
    for _ in 0..2 {
        let line = tokio::time::timeout(READ_TIMEOUT, tail.next_line())
            .await
            .expect("line within timeout")
            .expect("stream open");
        texts.push(line.text);
    }

    // Assert
    assert_eq!(
        texts,
        vec![
            "[12:00:01] [Server thread/INFO]: Steve joined the game",
            "[12:00:02] [Server thread/INFO]: Steve left the game",
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_follow_rotation_while_consumer_is_busy() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("latest.log");
    let rotated = dir.path().join("2024-01-01-1.log");
    std::fs::write(&path, "x: A joined the game\n").expect("write");

    let mut tail = LogTail::open(&path).await.expect("open tail");

    // Act: rotate without awaiting the tail, as if a send were in flight
    std::fs::rename(&path, &rotated).expect("rotate");
    std::fs::write(&path, "").expect("recreate");
    for i in 0..3 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        append_line(&path, &format!("x: C{} joined the game", i));
    }

    let line = tokio::time::timeout(READ_TIMEOUT, tail.next_line())
        .await
        .expect("line within timeout")
        .expect("stream open");

    // Assert
    assert!(line.error.is_none());
    assert_eq!(line.text, "x: C0 joined the game");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_follow_truncation_in_place() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("latest.log");
    std::fs::write(
        &path,
        "[11:59:59] [Server thread/INFO]: Starting minecraft server version 1.20.4\n",
    )
    .expect("write");

    let mut tail = LogTail::open(&path).await.expect("open tail");

    // Act
    std::fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .expect("open for truncate")
        .set_len(0)
        .expect("truncate");
    tokio::time::sleep(Duration::from_millis(500)).await;
    append_line(&path, "x: D left the game");

    let line = tokio::time::timeout(READ_TIMEOUT, tail.next_line())
        .await
        .expect("line within timeout")
        .expect("stream open");

    // Assert
    assert_eq!(line.text, "x: D left the game");
}

#[tokio::test]
async fn should_fail_run_when_log_file_missing() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("latest.log");
    let args = Args {
        logfile: missing.clone(),
    };
    let config = AppConfig::from_lookup(args, |key| match key {
        "APP_TOKEN" => Some("token".to_string()),
        "CHANNEL_ID" => Some("1".to_string()),
        _ => None,
    })
    .expect("config");

    // Act
    let result = mclog_notifier::run(config).await;

    // Assert
    match result {
        Err(AppError::TailOpen { path, .. }) => assert_eq!(path, missing),
        other => panic!("Expected TailOpen, got {:?}", other),
    }
}

#[test]
fn should_fail_before_startup_when_channel_missing() {
    // Arrange
    let args = Args {
        logfile: PathBuf::from("latest.log"),
    };

    // Act
    let result = AppConfig::from_lookup(args, |key| match key {
        "APP_TOKEN" => Some("token".to_string()),
        _ => None,
    });

    // Assert
    let err: AppError = result.err().expect("config error").into();
    assert!(matches!(
        err,
        AppError::Config(ConfigError::MissingVar("CHANNEL_ID"))
    ));
    assert_eq!(err.to_string(), "please set CHANNEL_ID");
}
