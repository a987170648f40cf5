#![doc = include_str!("../README.md")]

mod bench;

use bench::config::{AppConfig, CliArgs, CommandConfig, StoreKind};
use bench::report::{read_summary, write_summary};
use bench::scylla::ScyllaStore;
use bench::telemetry::init_telemetry;
use clap::Parser;
use seriesbench::{MemoryStore, PipelineRunner, ReadRunner, Store, truncate_all};
use std::sync::Arc;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry(config.log_format)?;
    log_startup_info(&config);

    match config.store {
        StoreKind::Scylla => {
            let store = ScyllaStore::connect(&config.connection).await?;
            run_command(Arc::new(store), config.command).await
        }
        StoreKind::Memory => run_command(Arc::new(MemoryStore::new()), config.command).await,
    }
}

async fn run_command<S: Store>(store: Arc<S>, command: CommandConfig) -> anyhow::Result<()> {
    match command {
        CommandConfig::Write { bench, cleanup } => {
            if cleanup {
                truncate_all(&*store).await?;
                tracing::info!("Cleaned up previous data");
            }
            let metrics = PipelineRunner::new(store, bench).run().await?;
            println!("{}", write_summary(&metrics));
        }
        CommandConfig::Read(read) => {
            let metrics = ReadRunner::new(store, read).run().await?;
            println!("{}", read_summary(&metrics));
        }
        CommandConfig::Cleanup => {
            truncate_all(&*store).await?;
            tracing::info!("Truncated benchmark tables");
        }
    }
    Ok(())
}

fn log_startup_info(config: &AppConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting benchmark with full config: {:#?}", config);
    } else {
        match &config.command {
            CommandConfig::Write { bench, .. } => tracing::info!(
                "Starting write benchmark: {} series x {} points with {} writers ({:?})",
                bench.series_count,
                bench.points_per_series,
                bench.parallel_writers,
                bench.strategy
            ),
            CommandConfig::Read(read) => tracing::info!(
                "Starting read benchmark with {} parallel reads",
                read.parallel_reads
            ),
            CommandConfig::Cleanup => tracing::info!("Truncating benchmark tables"),
        }
    }
}
