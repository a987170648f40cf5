use super::counters::{Progress, WriteCounters};
use crate::{DataPoint, Store, channel::Receiver};
use core::time::Duration;
use std::sync::Arc;

/// Per-pool settings every writer shares.
#[derive(Copy, Clone, Debug)]
pub struct WriterSettings {
    pub ttl: Duration,
    pub progress: Progress,
}

/// Writer task draining the queue into the store.
///
/// Runs until the queue is closed and drained. Every dequeued point is
/// written exactly once; a failed write is logged and the loop moves on.
/// Success or failure, the attempt is counted.
///
/// Returns the number of points this worker attempted.
///
/// # Arguments
///
/// - `worker_id`: Index of the worker, used in logs.
/// - `rx`: Shared queue receiver.
/// - `store`: Store the points are written to.
/// - `counters`: Attempt counters shared with the rest of the pool.
/// - `settings`: TTL and progress reporting.
pub async fn worker_loop<S>(
    worker_id: usize,
    rx: Receiver<DataPoint>,
    store: Arc<S>,
    counters: Arc<WriteCounters>,
    settings: WriterSettings,
) -> u64
where
    S: Store + ?Sized,
{
    tracing::trace!("Writer {worker_id} started");
    let mut attempted = 0_u64;

    while let Some(point) = rx.recv().await {
        let row = point.into_row(settings.ttl);
        let result = store.write_point(&row).await;

        if let Err(e) = &result {
            tracing::error!(
                worker_id,
                series_id = %row.series_id,
                "Failed to write point: {e}"
            );
        }

        attempted += 1;
        let total = counters.record_attempt(result.is_ok());
        settings.progress.observe(total);
    }

    tracing::trace!("Writer {worker_id} stopped after {attempted} points");
    attempted
}
