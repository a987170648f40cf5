//! Fixed-size pool of writer tasks.
//!
//! [`WriterPool`] spawns `size` workers that all consume the same queue. The
//! queue alone coordinates them: there is no dispatch, no per-worker channel
//! and no shutdown message. Each worker stops when it observes the queue
//! closed and drained, and [`WriterPool::join`] is the barrier that waits for
//! all of them.

use super::{
    counters::WriteCounters,
    worker::{WriterSettings, worker_loop},
};
use crate::{DataPoint, Error, Result, Store, channel::Receiver};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct WriterPool {
    workers: Vec<JoinHandle<u64>>,
    counters: Arc<WriteCounters>,
}

impl WriterPool {
    /// Spawns `size` writer tasks on the current Tokio runtime.
    ///
    /// Every worker gets a clone of `rx`; the original receiver is dropped
    /// here so the pool holds the only consumers.
    pub fn spawn<S>(
        size: usize,
        rx: Receiver<DataPoint>,
        store: Arc<S>,
        settings: WriterSettings,
    ) -> Self
    where
        S: Store + ?Sized,
    {
        let counters = Arc::new(WriteCounters::new());
        let workers = (0..size)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    rx.clone(),
                    Arc::clone(&store),
                    Arc::clone(&counters),
                    settings,
                ))
            })
            .collect();

        tracing::debug!("Spawned {size} writers");
        Self { workers, counters }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn counters(&self) -> &Arc<WriteCounters> {
        &self.counters
    }

    /// Waits for every worker to finish.
    ///
    /// All workers are awaited even if some of them panicked; the first
    /// failure is then reported as [`Error::TaskJoin`].
    pub async fn join(self) -> Result<Arc<WriteCounters>> {
        let results = futures::future::join_all(self.workers).await;

        let mut failure = None;
        for (worker_id, result) in results.into_iter().enumerate() {
            match result {
                Ok(attempted) => {
                    tracing::trace!("Writer {worker_id} joined after {attempted} points");
                }
                Err(e) => {
                    tracing::error!("Writer {worker_id} failed: {e}");
                    failure.get_or_insert(Error::TaskJoin {
                        context: format!("writer {worker_id}: {e}"),
                    });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(self.counters),
        }
    }
}
