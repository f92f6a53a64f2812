use crate::config::{LogFormat, LogLevel, LoggingConfig};
use crate::logging::{level_to_log_level, parse_log_level};
use tempfile::tempdir;

#[test]
fn test_init_twice_is_not_an_error() {
    let config = LoggingConfig {
        level: LogLevel::Debug,
        format: LogFormat::Compact,
        file: None,
        stdout: true,
    };

    assert!(crate::logging::init(&config).is_ok());
    assert!(crate::logging::init(&config).is_ok());
}

#[test]
fn test_file_logging_creates_parent_dir() {
    let temp_dir = tempdir().unwrap();
    let log_path = temp_dir.path().join("nested").join("moodmap.log");

    let config = LoggingConfig {
        level: LogLevel::Info,
        format: LogFormat::Json,
        file: Some(log_path.clone()),
        stdout: false,
    };

    assert!(crate::logging::init(&config).is_ok());
    assert!(log_path.parent().unwrap().exists());
}

#[test]
fn test_level_conversion() {
    assert!(parse_log_level("trace").is_ok());
    assert!(parse_log_level("DEBUG").is_ok());
    assert!(parse_log_level("warn").is_ok());
    assert!(parse_log_level("invalid").is_err());

    assert_eq!(level_to_log_level(tracing::Level::TRACE), LogLevel::Trace);
    assert_eq!(level_to_log_level(tracing::Level::WARN), LogLevel::Warn);
    assert_eq!(level_to_log_level(tracing::Level::ERROR), LogLevel::Error);
}
