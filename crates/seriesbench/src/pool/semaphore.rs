//! Queue-less write strategy.
//!
//! The producer itself spawns one task per point, after taking a permit from
//! a semaphore sized to the writer count. Permits are returned as writes
//! complete, so at most `permits` writes are ever in flight. Failed writes
//! are logged and counted exactly as in the pool strategy.

use super::{counters::WriteCounters, worker::WriterSettings};
use crate::{Error, PointStream, Result, Store};
use core::time::Duration;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Writes every point of `stream` with at most `permits` writes in flight.
///
/// Returns the number of points handed to a write task and the shared
/// counters once every write has completed. Waiting longer than
/// `acquire_timeout` for a permit aborts the run with
/// [`Error::BackPressure`]; writes still in flight are then cancelled.
#[tracing::instrument(skip_all, fields(permits = permits))]
pub async fn write_with_semaphore<S>(
    stream: PointStream,
    store: Arc<S>,
    permits: usize,
    acquire_timeout: Duration,
    settings: WriterSettings,
) -> Result<(u64, Arc<WriteCounters>)>
where
    S: Store + ?Sized,
{
    let semaphore = Arc::new(Semaphore::new(permits));
    let counters = Arc::new(WriteCounters::new());
    let mut writes = JoinSet::new();
    let mut produced = 0_u64;

    for point in stream {
        let permit = tokio::time::timeout(acquire_timeout, Arc::clone(&semaphore).acquire_owned())
            .await
            .map_err(|_| Error::BackPressure {
                waited: acquire_timeout,
            })?
            .map_err(|e| Error::TaskJoin {
                context: format!("write semaphore: {e}"),
            })?;

        let store = Arc::clone(&store);
        let counters = Arc::clone(&counters);
        writes.spawn(async move {
            let row = point.into_row(settings.ttl);
            let result = store.write_point(&row).await;
            drop(permit);

            if let Err(e) = &result {
                tracing::error!(series_id = %row.series_id, "Failed to write point: {e}");
            }

            let total = counters.record_attempt(result.is_ok());
            settings.progress.observe(total);
        });
        produced += 1;

        // Reap finished writes so the set stays around `permits` entries.
        while let Some(joined) = writes.try_join_next() {
            joined.map_err(|e| Error::TaskJoin {
                context: format!("write task: {e}"),
            })?;
        }
    }

    while let Some(joined) = writes.join_next().await {
        joined.map_err(|e| Error::TaskJoin {
            context: format!("write task: {e}"),
        })?;
    }

    tracing::debug!("Semaphore writer finished after {produced} points");
    Ok((produced, counters))
}
