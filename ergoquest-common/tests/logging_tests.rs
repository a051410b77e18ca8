use ergoquest_common::logging::{self, LogConfig, LogLevel};
use serde_json::json;
use std::sync::Once;

// Ensure logging is only initialized once across all tests
static INIT: Once = Once::new();

fn setup_logging() {
    INIT.call_once(|| {
        // Quiet configuration for tests
        let config = LogConfig {
            level: LogLevel::Error,
            log_file: None,
            include_timestamps: false,
            include_source_location: false,
            json_format: false,
        };

        // Other tests in this binary may have installed a logger already
        let _ = logging::init(&config);
    });
}

#[test]
fn test_logging_initialization() {
    setup_logging();

    // Repeated initialization is a no-op
    assert!(logging::init(&LogConfig::default()).is_ok());
    assert!(ergoquest_common::init().is_ok());

    logging::set_log_level(LogLevel::Debug);
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    logging::set_log_level(LogLevel::Error);
    assert_eq!(log::max_level(), log::LevelFilter::Error);
}

#[test]
fn test_context_helpers_do_not_panic() {
    setup_logging();

    logging::log_selection(LogLevel::Info, "selection", Some(json!({ "pool_size": 3 })));
    logging::log_balance(LogLevel::Warn, "balance", None);
    logging::log_swap(LogLevel::Debug, "swap", Some(json!({ "input": "10" })));
    logging::log_config(LogLevel::Error, "config", None);
    logging::log_progress(LogLevel::Trace, "progress", None);
}

#[test]
fn test_default_config() {
    let config = LogConfig::default();

    assert_eq!(config.level, LogLevel::Info);
    assert!(config.log_file.is_none());
    assert!(config.include_timestamps);
    assert!(!config.include_source_location);
    assert!(!config.json_format);
}

#[test]
fn test_config_from_toml_defaults() {
    let config: LogConfig = toml::from_str("level = \"Debug\"").unwrap();
    assert_eq!(config.level, LogLevel::Debug);
    assert!(config.include_timestamps);
    assert!(!config.json_format);
}

#[test]
fn test_sanitize_for_logging() {
    assert_eq!(logging::sanitize_for_logging("box-1"), "box-1");
    assert_eq!(logging::sanitize_for_logging("123456789012"), "123456789012");
    assert_eq!(logging::sanitize_for_logging("1234567890123"), "1234...0123");
}
