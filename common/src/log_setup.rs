//! Subscriber setup for programs that drive `patchwork`, plus a test helper.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{self, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Verbosity and optional file sink for [`setup_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is unset, e.g. `"info"` or `"patchwork=debug"`.
    pub filter: String,
    pub file: Option<LogFile>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Daily rolling plain-text log files.
#[derive(Debug, Clone)]
pub struct LogFile {
    pub directory: PathBuf,
    pub prefix: String,
    /// Older files beyond this count are deleted on rotation.
    pub max_files: usize,
}

impl LogFile {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: "patchwork".to_string(),
            max_files: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogSetupError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to create log directory: {0}")]
    Directory(#[from] std::io::Error),

    #[error("Failed to create log file appender: {0}")]
    Appender(#[from] rolling::InitError),

    #[error("A log file is already open")]
    FileAlreadyOpen,

    #[error("Logger initialization failed: {0}")]
    Init(#[from] TryInitError),
}

/// `RUST_LOG` if set, otherwise `default`.
pub fn env_filter(default: &str) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))
}

/// Installs the global subscriber.
///
/// Events go to stderr so stdout stays free for coverage JSON. With
/// [`LogConfig::file`] they are also written, without colors, to daily files.
/// Fails if a global subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> Result<(), LogSetupError> {
    let filter = env_filter(&config.filter)?;

    let file_layer = match &config.file {
        Some(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer(file)?),
        ),
        None => None,
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

fn file_writer(file: &LogFile) -> Result<NonBlocking, LogSetupError> {
    std::fs::create_dir_all(&file.directory)?;
    let appender = rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&file.prefix)
        .filename_suffix("log")
        .max_log_files(file.max_files)
        .build(&file.directory)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    FILE_GUARD
        .set(guard)
        .map_err(|_| LogSetupError::FileAlreadyOpen)?;
    Ok(writer)
}

/// Initialize tracing for tests.
/// Safe to call multiple times - only the first call installs a subscriber.
/// Respects RUST_LOG, defaults to "info".
pub fn init_test_tracing() {
    let filter = env_filter("info").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
