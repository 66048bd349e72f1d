use orgdir_logger::{LevelFilter, Logger, LoggerError};
use serial_test::serial;

#[test]
#[serial]
fn console_logger_has_no_file_writer() {
    // Installs the process-wide subscriber; the next test relies on it being present.
    let logger = Logger::builder()
        .name("orgdir-console")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");

    assert!(!logger.writes_files());
    std::mem::forget(logger);
}

#[test]
#[serial]
fn second_init_returns_subscriber_error() {
    let _ = Logger::builder().name("orgdir-first").init();

    let err = Logger::builder()
        .name("orgdir-second")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
