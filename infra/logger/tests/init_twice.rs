use herald_logger::{LogConfig, Logger, LoggerError};

fn config(name: &str) -> LogConfig {
    LogConfig { name: name.to_owned(), level: "warn".to_owned(), ..LogConfig::default() }
}

#[test]
fn second_host_logger_is_rejected_and_first_stays_installed() {
    let first = Logger::from_config(&config("arena")).expect("first logger should install");

    let err = Logger::from_config(&config("replay")).expect_err("second logger should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "unexpected error: {err}");
    assert!(err.to_string().contains("(Logger replay)"), "error should name the rejected logger: {err}");
    assert_eq!(first.name(), "arena");
}
