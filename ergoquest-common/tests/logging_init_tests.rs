//! Runs in its own test binary so the first `init` call is the one under test

use ergoquest_common::logging::{self, LogConfig, LogLevel};
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn test_unopenable_log_file_still_installs_console_logger() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-dir").join("quest.log");

    let config = LogConfig {
        level: LogLevel::Debug,
        log_file: Some(missing.to_string_lossy().into_owned()),
        ..LogConfig::default()
    };

    let err = logging::init(&config).unwrap_err();
    assert!(err.contains("Failed to open log file"));

    // The console logger is active at the configured level
    assert_eq!(log::max_level(), LevelFilter::Debug);
    assert!(logging::init(&LogConfig::default()).is_ok());
}
