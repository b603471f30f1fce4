//! Global subscriber installation (own process: one test binary, one subscriber)

use leasehold_log::{Config, Format, LogError, LoggerBuilder};

#[test]
fn installs_once_then_refuses() {
    let err = LoggerBuilder::from_config(Config::default().with_level("leasehold=verbose"))
        .build()
        .unwrap_err();
    assert!(matches!(err, LogError::Filter(_)));

    let guard = leasehold_log::init(Config::production()).expect("first install");
    assert_eq!(guard.format(), Format::Json);
    tracing::info!(component = "test", "subscriber installed");

    let err = leasehold_log::init(Config::development()).unwrap_err();
    assert!(matches!(err, LogError::AlreadyInitialized(_)));
}
