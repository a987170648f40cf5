use crate::{PointRow, SeriesId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`Store`] operation.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The backing client failed (connection, timeout, server error).
    #[error("Store request failed: {0}")]
    Backend(#[source] BoxError),

    /// The store refused the request.
    #[error("Store rejected request: {reason}")]
    Rejected { reason: String },
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Backend(err.into())
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Tables touched by the benchmark.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    /// One row per registered series.
    Series,
    /// One row per written point, partitioned by series and day.
    Points,
}

impl Table {
    pub const ALL: [Self; 2] = [Self::Series, Self::Points];

    /// Name of the table in the benchmark keyspace.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Series => "SerieId",
            Self::Points => "Timeserie",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.name())
    }
}

/// The persistent store the benchmark writes into and reads back from.
///
/// A single instance is shared by every writer task, so implementations must
/// tolerate concurrent calls. None of the operations retry.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Removes every row of `table`.
    async fn truncate(&self, table: Table) -> Result<(), StoreError>;

    /// Persists one series identifier.
    async fn register_series(&self, id: SeriesId) -> Result<(), StoreError>;

    /// Persists one point with a server-side expiry of `row.ttl_secs`.
    async fn write_point(&self, row: &PointRow) -> Result<(), StoreError>;

    /// Lists every registered series.
    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError>;

    /// Counts the points stored for `id` in the day starting at `day`.
    async fn read_day(&self, id: SeriesId, day: DateTime<Utc>) -> Result<u64, StoreError>;
}
