use anyhow::{anyhow, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::utils::LogFormat;

/// Filter when `RUST_LOG` is unset: silent, so a failed run writes only its
/// `error: <kind>: <detail>` line to stderr
pub(crate) const DEFAULT_LOG_FILTER: &str = "off";

/// Install the global tracing subscriber, writing to stderr
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };

    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;
    debug!(?format, "Tracing initialized");
    Ok(())
}
