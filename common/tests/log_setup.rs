use common::log_setup::{setup_logging, LogConfig, LogFile, LogSetupError};

#[test]
fn setup_logging_installs_once_with_file_sink() {
    let directory = std::env::temp_dir().join(format!("patchwork_logs_{}", std::process::id()));
    let config = LogConfig {
        filter: "debug".to_string(),
        file: Some(LogFile::new(&directory)),
    };

    setup_logging(&config).unwrap();
    tracing::info!(directory = %directory.display(), "logging initialized");
    assert!(directory.is_dir());

    // A second file sink would orphan the first one's writer thread.
    assert!(matches!(
        setup_logging(&config),
        Err(LogSetupError::FileAlreadyOpen)
    ));
    // Console only still conflicts with the installed subscriber.
    assert!(matches!(
        setup_logging(&LogConfig::default()),
        Err(LogSetupError::Init(_))
    ));
}
