//! Read-back benchmark.
//!
//! Lists every registered series and reads the current day's points of each,
//! `parallel_reads` series at a time. Batches run one after the other; within
//! a batch all reads are issued concurrently and awaited together.

use crate::{Error, ReadConfig, Result, SeriesId, Store, runner::rate, start_of_day};
use chrono::{DateTime, Utc};
use core::time::Duration;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of a read run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReadMetrics {
    pub series: usize,
    pub points: u64,
    pub elapsed: Duration,
}

impl ReadMetrics {
    pub fn points_per_second(&self) -> f64 {
        rate(self.points, self.elapsed)
    }
}

pub struct ReadRunner<S>
where
    S: Store + ?Sized,
{
    store: Arc<S>,
    config: ReadConfig,
}

impl<S> ReadRunner<S>
where
    S: Store + ?Sized,
{
    pub fn new(store: Arc<S>, config: ReadConfig) -> Self {
        Self { store, config }
    }

    /// Reads back today's points for every registered series.
    pub async fn run(&self) -> Result<ReadMetrics> {
        self.run_for_day(start_of_day(Utc::now())).await
    }

    /// Reads back the points of `day` for every registered series.
    ///
    /// The first failed read aborts the run.
    #[tracing::instrument(skip_all, fields(parallel_reads = self.config.parallel_reads))]
    pub async fn run_for_day(&self, day: DateTime<Utc>) -> Result<ReadMetrics> {
        self.config.validate()?;

        let ids = self
            .store
            .list_series()
            .await
            .map_err(|source| Error::Read {
                context: "listing series".to_string(),
                source,
            })?;
        tracing::info!("{} series to read", ids.len());

        let start = Instant::now();
        let mut points = 0_u64;

        for batch in ids.chunks(self.config.parallel_reads) {
            let batch_start = Instant::now();
            points += self.read_batch(batch, day).await?;
            tracing::info!("Read {} series in {:?}", batch.len(), batch_start.elapsed());
        }

        let metrics = ReadMetrics {
            series: ids.len(),
            points,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Read complete, {} series ({} total points) in {:?} ({:.0} point/s)",
            metrics.series,
            metrics.points,
            metrics.elapsed,
            metrics.points_per_second()
        );
        Ok(metrics)
    }

    async fn read_batch(&self, batch: &[SeriesId], day: DateTime<Utc>) -> Result<u64> {
        let reads = batch.iter().map(|&id| async move {
            self.store
                .read_day(id, day)
                .await
                .map_err(|source| Error::Read {
                    context: format!("series {id}"),
                    source,
                })
        });

        futures::future::join_all(reads)
            .await
            .into_iter()
            .try_fold(0_u64, |total, read: Result<u64>| -> Result<u64> {
                Ok(total + read?)
            })
    }
}
