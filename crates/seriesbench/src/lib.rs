//! # seriesbench
//!
//! A throughput benchmark for bulk-loading synthetic time series into a
//! store.
//!
//! A run generates a fixed set of series identifiers, registers them, then
//! streams the full `series × seconds` grid of points through a bounded
//! queue into a fixed pool of writer tasks:
//!
//! ```text
//! IdentitySet ──register──▶ Store
//!      │
//!      ▼
//! PointStream ──produce──▶ channel (bounded) ──▶ WriterPool (N tasks) ──write──▶ Store
//!                                                       │
//!                                                       ▼
//!                                              WriteCounters ──▶ RunMetrics
//! ```
//!
//! [`WriteStrategy::Semaphore`] replaces the queue and the pool: the producer
//! spawns one write per point, with a semaphore capping the writes in flight.
//!
//! ## Example
//!
//! ```no_run
//! use seriesbench::{BenchConfig, MemoryStore, PipelineRunner};
//! use std::sync::Arc;
//!
//! # async fn run() -> seriesbench::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let config = BenchConfig::new(100, 16).with_points_per_series(600);
//! let metrics = PipelineRunner::new(store, config).run().await?;
//! println!("{:.0} point/s", metrics.points_per_second());
//! # Ok(())
//! # }
//! ```

pub mod channel;
mod config;
mod error;
mod id;
mod point;
pub mod pool;
mod read;
mod runner;
mod store;
mod stream;
#[cfg(test)]
mod test_utils;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::point::*;
pub use crate::pool::{
    Progress, WriteCounters, WriterPool, WriterSettings, write_with_semaphore,
};
pub use crate::read::*;
pub use crate::runner::{PipelineRunner, RunMetrics};
pub use crate::store::*;
pub use crate::stream::*;
