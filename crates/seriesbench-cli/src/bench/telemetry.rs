//! Console logging.
//!
//! Everything the benchmark reports goes through `tracing`. The level is read
//! from `RUST_LOG` and defaults to `info`, which shows progress lines, per
//! batch read timings and every failed write.
//!
//! ```bash
//! RUST_LOG=seriesbench=debug seriesbench write --series 10
//! seriesbench --log-format json write | jq .
//! ```

use crate::bench::config::LogFormat;
use tracing_subscriber::{
    EnvFilter, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    let layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_line_number(true)
        .with_target(false)
        .with_timer(ChronoLocal::rfc_3339())
        .with_file(true);

    match format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Json => registry.with(layer.json()).try_init()?,
    }

    Ok(())
}
