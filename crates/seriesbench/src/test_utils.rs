//! Store stubs and log capture shared by the unit tests.

use crate::{MemoryStore, PointRow, SeriesId, Store, StoreError, Table};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Wraps a [`MemoryStore`], failing every `nth` point write.
#[derive(Debug, Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) nth: usize,
    pub(crate) writes: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn failing_every(nth: usize) -> Self {
        Self {
            inner: MemoryStore::retaining(),
            nth,
            writes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn truncate(&self, table: Table) -> Result<(), StoreError> {
        self.inner.truncate(table).await
    }

    async fn register_series(&self, id: SeriesId) -> Result<(), StoreError> {
        self.inner.register_series(id).await
    }

    async fn write_point(&self, row: &PointRow) -> Result<(), StoreError> {
        let call = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.nth != 0 && call % self.nth == 0 {
            return Err(StoreError::rejected(format!("write #{call} refused")));
        }
        self.inner.write_point(row).await
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        self.inner.list_series().await
    }

    async fn read_day(&self, id: SeriesId, day: DateTime<Utc>) -> Result<u64, StoreError> {
        self.inner.read_day(id, day).await
    }
}

/// Fails the `nth` series registration (1-based) and counts every call.
#[derive(Debug, Default)]
pub(crate) struct RegistrationFailStore {
    pub(crate) nth: usize,
    pub(crate) registrations: AtomicUsize,
    pub(crate) writes: AtomicUsize,
}

impl RegistrationFailStore {
    pub(crate) fn failing_at(nth: usize) -> Self {
        Self {
            nth,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Store for RegistrationFailStore {
    async fn truncate(&self, _table: Table) -> Result<(), StoreError> {
        Ok(())
    }

    async fn register_series(&self, _id: SeriesId) -> Result<(), StoreError> {
        let call = self.registrations.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.nth {
            return Err(StoreError::rejected("registration refused"));
        }
        Ok(())
    }

    async fn write_point(&self, _row: &PointRow) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        Ok(Vec::new())
    }

    async fn read_day(&self, _id: SeriesId, _day: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(0)
    }
}

/// Tracks how many writes are in flight at once.
#[derive(Debug, Default)]
pub(crate) struct DepthStore {
    pub(crate) delay: Duration,
    pub(crate) current: AtomicUsize,
    pub(crate) max: AtomicUsize,
    pub(crate) writes: AtomicUsize,
}

impl DepthStore {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Store for DepthStore {
    async fn truncate(&self, _table: Table) -> Result<(), StoreError> {
        Ok(())
    }

    async fn register_series(&self, _id: SeriesId) -> Result<(), StoreError> {
        Ok(())
    }

    async fn write_point(&self, _row: &PointRow) -> Result<(), StoreError> {
        let depth = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(depth, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        Ok(Vec::new())
    }

    async fn read_day(&self, _id: SeriesId, _day: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(0)
    }
}

/// A [`MemoryStore`] whose series registrations each take `delay`.
#[derive(Debug, Default)]
pub(crate) struct SlowRegistrationStore {
    pub(crate) inner: MemoryStore,
    pub(crate) delay: Duration,
}

impl SlowRegistrationStore {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Store for SlowRegistrationStore {
    async fn truncate(&self, table: Table) -> Result<(), StoreError> {
        self.inner.truncate(table).await
    }

    async fn register_series(&self, id: SeriesId) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.register_series(id).await
    }

    async fn write_point(&self, row: &PointRow) -> Result<(), StoreError> {
        self.inner.write_point(row).await
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        self.inner.list_series().await
    }

    async fn read_day(&self, id: SeriesId, day: DateTime<Utc>) -> Result<u64, StoreError> {
        self.inner.read_day(id, day).await
    }
}

/// Panics on every write.
#[derive(Debug, Default)]
pub(crate) struct PanicStore;

#[async_trait]
impl Store for PanicStore {
    async fn truncate(&self, _table: Table) -> Result<(), StoreError> {
        Ok(())
    }

    async fn register_series(&self, _id: SeriesId) -> Result<(), StoreError> {
        Ok(())
    }

    async fn write_point(&self, _row: &PointRow) -> Result<(), StoreError> {
        panic!("store exploded");
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        Ok(Vec::new())
    }

    async fn read_day(&self, _id: SeriesId, _day: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(0)
    }
}

/// Counts `ERROR` events emitted by the pool's write paths.
///
/// The subscriber is installed for the current thread only, so tests using it
/// must run on a current-thread runtime.
#[derive(Clone, Debug, Default)]
pub(crate) struct WriteErrorCounter {
    count: Arc<AtomicUsize>,
}

impl WriteErrorCounter {
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S> tracing_subscriber::Layer<S> for WriteErrorCounter
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == tracing::Level::ERROR
            && metadata.target().starts_with("seriesbench::pool::")
        {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
