//! Process-wide `tracing` subscriber.

use intake_core::config::{LogConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Install the subscriber. `RUST_LOG` wins over `log.filter`; `debug`
/// forces the `debug` level regardless of both.
pub fn init(config: &LogConfig, debug: bool) -> anyhow::Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(&config.filter))
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))
}
