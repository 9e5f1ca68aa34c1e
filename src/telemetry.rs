//! Process-wide logging setup.

use rumour_core::{ConfigError, CoreError, ErrorReporter, LoggingConfig};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::{MakeWriter, MakeWriterExt};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over the configured filter when set.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, CoreError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|e| {
        CoreError::from(ConfigError::InvalidValue {
            field: "logging.filter".to_string(),
            value: format!("{} ({})", config.filter, e),
        })
    })
}

/// Installs the global subscriber: stdout, plus the configured log file in append mode.
pub fn init(config: &LoggingConfig) -> Result<(), CoreError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_writer(std::io::stdout.and(Mutex::new(file)))
                .try_init()
        }
        None => builder.with_writer(std::io::stdout).try_init(),
    };

    installed.map_err(|e| CoreError::Internal {
        message: format!("Logging already initialised: {}", e),
    })
}

/// Logs a failure that happened before [`init`] installed the configured subscriber.
///
/// Goes to stderr with timestamp and level through a subscriber scoped to this call.
pub fn report_startup_failure(error: &CoreError) {
    report_with_writer(error, std::io::stderr);
}

fn report_with_writer<W>(error: &CoreError, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || ErrorReporter::new().report_error(error));
}
