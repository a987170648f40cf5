//! Orchestration of one write benchmark run.
//!
//! [`PipelineRunner::run`] performs, in order:
//!
//! 1. Start the clock, then register every identifier of the
//!    [`IdentitySet`] with the store. Any failure aborts before a single
//!    point is generated.
//! 2. Stream the grid into the store with the configured
//!    [`WriteStrategy`]. With [`WriteStrategy::Pool`] a producer task fills a
//!    fresh bounded queue drained by the [`WriterPool`]; with
//!    [`WriteStrategy::Semaphore`] the producer spawns the writes itself.
//! 3. Wait for every write to complete. For the pool this is joining every
//!    writer, which only exit once the queue is closed and drained.
//! 4. Stop the clock and report [`RunMetrics`]. The measured window covers
//!    registration too; its share is reported on the side.

use crate::{
    BenchConfig, Error, IdentitySet, PointStream, Progress, Result, Store, WriteCounters,
    WriteStrategy, WriterPool, WriterSettings, channel, produce, start_of_day,
    write_with_semaphore,
};
use chrono::{DateTime, Utc};
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;


/// Outcome of a write run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunMetrics {
    /// Points the producer enqueued.
    pub produced: u64,
    /// Write attempts issued, successful or not.
    pub attempted: u64,
    /// Attempts the store reported as failed. Included in `attempted`.
    pub failed: u64,
    /// Time spent registering series. Part of `elapsed`.
    pub registration: Duration,
    /// Wall-clock time from the first registration to the last write
    /// completing.
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Attempted writes per second over the measured window.
    pub fn points_per_second(&self) -> f64 {
        rate(self.attempted, self.elapsed)
    }

    pub fn succeeded(&self) -> u64 {
        self.attempted - self.failed
    }
}

pub(crate) fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}

/// Runs the generation-and-ingestion pipeline against a store.
pub struct PipelineRunner<S>
where
    S: Store + ?Sized,
{
    store: Arc<S>,
    config: BenchConfig,
}

impl<S> PipelineRunner<S>
where
    S: Store + ?Sized,
{
    pub fn new(store: Arc<S>, config: BenchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs the benchmark with fresh identifiers, anchored at the start of
    /// the current UTC day.
    pub async fn run(&self) -> Result<RunMetrics> {
        self.config.validate()?;
        let ids = IdentitySet::generate(self.config.series_count);
        self.run_with(ids, start_of_day(Utc::now())).await
    }

    /// Runs the benchmark for the given identifiers and time anchor.
    ///
    /// `config.series_count` is ignored in favour of `ids.len()`.
    #[tracing::instrument(
        skip_all,
        fields(
            series = ids.len(),
            writers = self.config.parallel_writers,
            strategy = ?self.config.strategy,
        )
    )]
    pub async fn run_with(&self, ids: IdentitySet, anchor: DateTime<Utc>) -> Result<RunMetrics> {
        self.config.validate()?;

        let start = Instant::now();
        ids.register(&*self.store).await?;
        let registration = start.elapsed();
        tracing::info!("Registered {} series in {:?}", ids.len(), registration);

        let total = (ids.len() as u64).saturating_mul(self.config.points_per_series as u64);
        let settings = WriterSettings {
            ttl: self.config.ttl,
            progress: Progress::new(self.config.progress_interval, total),
        };

        let stream = PointStream::new(
            &ids,
            self.config.points_per_series,
            anchor,
            self.config.seed,
        );
        let (produced, counters) = match self.config.strategy {
            WriteStrategy::Pool => self.write_through_pool(stream, settings).await?,
            WriteStrategy::Semaphore => {
                write_with_semaphore(
                    stream,
                    Arc::clone(&self.store),
                    self.config.parallel_writers,
                    self.config.acquire_timeout,
                    settings,
                )
                .await?
            }
        };
        let elapsed = start.elapsed();

        let metrics = RunMetrics {
            produced,
            attempted: counters.attempted(),
            failed: counters.failed(),
            registration,
            elapsed,
        };
        tracing::info!(
            "Insertion complete, {} data points in {:?} ({:.0} point/s, {} failed)",
            metrics.attempted,
            metrics.elapsed,
            metrics.points_per_second(),
            metrics.failed
        );
        Ok(metrics)
    }

    async fn write_through_pool(
        &self,
        stream: PointStream,
        settings: WriterSettings,
    ) -> Result<(u64, Arc<WriteCounters>)> {
        let (tx, rx) = channel::bounded(self.config.channel_capacity);
        let pool = WriterPool::spawn(
            self.config.parallel_writers,
            rx,
            Arc::clone(&self.store),
            settings,
        );
        let producer = tokio::spawn(produce(stream, tx));

        let joined = pool.join().await;
        let produced = producer.await.map_err(|e| Error::TaskJoin {
            context: format!("producer: {e}"),
        })?;
        Ok((produced, joined?))
    }
}
