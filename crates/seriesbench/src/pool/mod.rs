//! Writer pool: consumers of the point queue.
//!
//! ## Structure
//!
//! - [`manager`] - spawning and joining the pool (`WriterPool`).
//! - [`worker`] - the per-task write loop.
//! - [`counters`] - shared attempt counters and progress reporting.
//! - [`semaphore`] - the queue-less alternative, bounded by a semaphore.

pub mod counters;
pub mod manager;
pub mod semaphore;
pub mod worker;


pub use counters::{Progress, WriteCounters};
pub use manager::WriterPool;
pub use semaphore::write_with_semaphore;
pub use worker::{WriterSettings, worker_loop};
