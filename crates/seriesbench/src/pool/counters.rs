use portable_atomic::{AtomicU64, Ordering};

/// Write attempt counters shared by every writer.
///
/// `attempted` counts every write issued, whatever its outcome, and is the
/// basis of the reported throughput. `failed` is tracked on the side so a
/// report can tell how many of those attempts the store rejected.
#[derive(Debug, Default)]
pub struct WriteCounters {
    attempted: AtomicU64,
    failed: AtomicU64,
}

impl WriteCounters {
    pub const fn new() -> Self {
        Self {
            attempted: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Records one attempt and returns the attempt total including it.
    pub fn record_attempt(&self, succeeded: bool) -> u64 {
        if !succeeded {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.attempted.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Emits a progress line every `interval` attempts.
#[derive(Copy, Clone, Debug)]
pub struct Progress {
    interval: u64,
    total: u64,
}

impl Progress {
    pub const fn new(interval: u64, total: u64) -> Self {
        Self { interval, total }
    }

    /// Returns the completed percentage when `attempted` lands on an
    /// interval boundary.
    pub fn checkpoint(&self, attempted: u64) -> Option<u64> {
        if self.interval == 0 || attempted % self.interval != 0 {
            return None;
        }
        Some(attempted.saturating_mul(100) / self.total.max(1))
    }

    pub fn observe(&self, attempted: u64) {
        if let Some(percent) = self.checkpoint(attempted) {
            tracing::info!("Inserted {attempted} data points ({percent}% of total)");
        }
    }
}
