use crate::{Error, POINT_TTL, POINTS_PER_SERIES, Result};
use core::time::Duration;

/// Default capacity of the queue between the producer and the writers.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100_000;

/// Seed of the value generator. Fixed so runs are comparable.
pub const DEFAULT_SEED: u64 = 123;

/// How many attempted writes between two progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 50_000;

/// How long the semaphore strategy waits for a free write slot.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// How generated points reach the store.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WriteStrategy {
    /// A bounded queue drained by `parallel_writers` writer tasks.
    #[default]
    Pool,
    /// No queue: the producer spawns one write per point, with at most
    /// `parallel_writers` of them in flight.
    Semaphore,
}

/// Settings of one write benchmark run.
///
/// `series_count` and `parallel_writers` describe the workload; the remaining
/// fields default to the values the benchmark has always used and exist so
/// tests and smaller runs can shrink the grid.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub series_count: usize,
    pub parallel_writers: usize,
    pub points_per_series: usize,
    pub channel_capacity: usize,
    pub seed: u64,
    pub ttl: Duration,
    pub progress_interval: u64,
    pub strategy: WriteStrategy,
    /// Only used by [`WriteStrategy::Semaphore`].
    pub acquire_timeout: Duration,
}

impl BenchConfig {
    pub const fn new(series_count: usize, parallel_writers: usize) -> Self {
        Self {
            series_count,
            parallel_writers,
            points_per_series: POINTS_PER_SERIES,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            seed: DEFAULT_SEED,
            ttl: POINT_TTL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            strategy: WriteStrategy::Pool,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_points_per_series(mut self, points_per_series: usize) -> Self {
        self.points_per_series = points_per_series;
        self
    }

    #[must_use]
    pub const fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub const fn with_progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    #[must_use]
    pub const fn with_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub const fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    /// Number of points the run will generate, saturating at `u64::MAX`.
    pub fn total_points(&self) -> u64 {
        (self.series_count as u64).saturating_mul(self.points_per_series as u64)
    }

    /// Rejects settings that would stall or panic the pipeline.
    ///
    /// Zero writers would leave the producer blocked on a full queue forever,
    /// and a zero-capacity queue cannot be built.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_writers == 0 {
            return Err(Error::InvalidConfig {
                reason: "parallel_writers must be greater than 0".to_string(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "channel_capacity must be greater than 0".to_string(),
            });
        }
        if self.progress_interval == 0 {
            return Err(Error::InvalidConfig {
                reason: "progress_interval must be greater than 0".to_string(),
            });
        }
        if self.strategy == WriteStrategy::Semaphore && self.acquire_timeout.is_zero() {
            return Err(Error::InvalidConfig {
                reason: "acquire_timeout must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings of one read benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct ReadConfig {
    /// Number of series read concurrently within a batch.
    pub parallel_reads: usize,
}

impl ReadConfig {
    pub const fn new(parallel_reads: usize) -> Self {
        Self { parallel_reads }
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel_reads == 0 {
            return Err(Error::InvalidConfig {
                reason: "parallel_reads must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_workload() {
        let config = BenchConfig::new(5000, 500);
        assert_eq!(config.points_per_series, 18_000);
        assert_eq!(config.channel_capacity, 100_000);
        assert_eq!(config.seed, 123);
        assert_eq!(config.ttl.as_secs(), 691_200);
        assert_eq!(config.total_points(), 90_000_000);
        assert_eq!(config.strategy, WriteStrategy::Pool);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_writers_and_capacity() {
        let err = BenchConfig::new(1, 0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = BenchConfig::new(1, 1)
            .with_channel_capacity(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = BenchConfig::new(1, 1)
            .with_strategy(WriteStrategy::Semaphore)
            .with_acquire_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        assert!(ReadConfig::new(0).validate().is_err());
        assert!(ReadConfig::new(1).validate().is_ok());
    }

    #[test]
    fn empty_grid_is_valid() {
        let config = BenchConfig::new(0, 4).with_points_per_series(0);
        assert!(config.validate().is_ok());
        assert_eq!(config.total_points(), 0);
    }
}
