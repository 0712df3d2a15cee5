use tracing_subscriber::EnvFilter;

use onward_core::config::LoggingConfig;
use onward_core::error::{OnwardError, Result};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so command output on stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| OnwardError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| OnwardError::Config(format!("Failed to initialize logging: {}", e)))
}
