//! tracing setup for the sync tool.
//!
//! Log lines double as the tool's user-facing output, so targets are
//! suppressed and only the message is shown. `RUST_LOG`, when set,
//! overrides the requested level.

use tracing_subscriber::EnvFilter;

pub fn init(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging setup failed: {e}"))?;

    Ok(())
}
