//! Subscriber initialization runs in its own test binary so it cannot
//! collide with other global subscribers.

use openxc::config::LoggingConfig;
use openxc::logging::{self, LogFormat};

#[test]
fn test_init_is_idempotent() {
    let config = LoggingConfig {
        level: "debug".into(),
        format: LogFormat::Compact,
    };
    assert!(logging::init(&config).is_ok());
    assert!(logging::init(&config).is_ok());
    tracing::debug!("logging initialized twice");
}

#[test]
fn test_init_rejects_unknown_level() {
    let config = LoggingConfig {
        level: "chatty".into(),
        ..Default::default()
    };
    assert!(logging::init(&config).is_err());
}
