use herald_logger::{LogConfig, LogRotation, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_logging_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LogConfig {
        name: "integration-file-logging".to_owned(),
        console: false,
        path: Some(log_dir.clone()),
        json: true,
        rotation: LogRotation::Never,
        ..LogConfig::default()
    };
    let logger = Logger::from_config(&config)?;
    assert!(logger.guard().is_some());

    tracing::info!(listener = "listener-1", "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let first = contents.lines().next().expect("log file should not be empty");
    assert!(first.starts_with('{'), "expected JSON lines, got: {first}");
    assert!(first.contains("hello from integration test"));

    Ok(())
}
