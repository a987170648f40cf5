//! Error types for the benchmark pipeline.
//!
//! Only setup failures surface here: invalid configuration, truncation,
//! series registration and read-back. Individual point writes never produce
//! an [`Error`]; they are logged and counted by the writer pool instead.

use crate::{SeriesId, StoreError, Table};
use core::time::Duration;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Fatal errors that abort a benchmark run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Clearing a table before the run failed.
    #[error("Failed to truncate table {table}")]
    Truncate {
        table: Table,
        #[source]
        source: StoreError,
    },

    /// A series identifier could not be registered.
    #[error("Failed to register series #{index} ({id})")]
    Registration {
        index: usize,
        id: SeriesId,
        #[source]
        source: StoreError,
    },

    /// A read benchmark query failed.
    #[error("Read failed: {context}")]
    Read {
        context: String,
        #[source]
        source: StoreError,
    },

    /// No write slot freed up in time under the semaphore strategy.
    #[error("Back pressure: no write slot freed up within {waited:?}")]
    BackPressure { waited: Duration },

    /// A producer or writer task panicked.
    #[error("Task failed: {context}")]
    TaskJoin { context: String },
}
