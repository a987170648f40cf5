use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use core::time::Duration;
use seriesbench::{
    BenchConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_PROGRESS_INTERVAL, DEFAULT_SEED,
    POINTS_PER_SERIES, ReadConfig, WriteStrategy,
};

/// Default page size of read-back queries.
pub const DEFAULT_PAGE_SIZE: i32 = 5_000;

/// Runtime configuration for the `seriesbench` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file), which is convenient when the same cluster settings are shared by
/// several runs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seriesbench",
    version,
    about = "Write and read throughput benchmark of synthetic time series"
)]
pub struct CliArgs {
    /// Cluster nodes to contact, comma separated.
    ///
    /// Environment variable: `CONTACT_POINTS`
    #[arg(
        long,
        env = "CONTACT_POINTS",
        value_delimiter = ',',
        default_value = "127.0.0.1:9042"
    )]
    pub contact_points: Vec<String>,

    /// Datacenter preferred by the load balancing policy. When unset, every
    /// datacenter is treated as local.
    ///
    /// Environment variable: `DATACENTER`
    #[arg(long, env = "DATACENTER")]
    pub datacenter: Option<String>,

    /// Keyspace holding the `"SerieId"` and `"Timeserie"` tables.
    ///
    /// Environment variable: `KEYSPACE`
    #[arg(long, env = "KEYSPACE", default_value_t = String::from("CsharpDriverBenchmark"))]
    pub keyspace: String,

    /// Per-request timeout, in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT_SECS`
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 20)]
    pub request_timeout_secs: u64,

    /// Store to run against. `memory` measures the pipeline alone.
    ///
    /// Environment variable: `STORE`
    #[arg(long, env = "STORE", value_enum, default_value_t = StoreKind::Scylla)]
    pub store: StoreKind,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Scylla,
    Memory,
}

/// Write path used by the `write` command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Bounded queue drained by a fixed pool of writer tasks.
    Pool,
    /// One task per point, with in-flight writes bounded by a semaphore.
    Semaphore,
}

impl From<Strategy> for WriteStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Pool => Self::Pool,
            Strategy::Semaphore => Self::Semaphore,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Bulk-load the synthetic grid and report the insertion rate.
    Write(WriteArgs),
    /// Read back today's points of every registered series.
    Read(ReadArgs),
    /// Truncate the benchmark tables.
    Cleanup,
}

#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Number of series to generate.
    ///
    /// Environment variable: `SERIES`
    #[arg(long, env = "SERIES", default_value_t = 5_000)]
    pub series: usize,

    /// How points reach the store.
    ///
    /// Environment variable: `STRATEGY`
    #[arg(long, env = "STRATEGY", value_enum, default_value_t = Strategy::Pool)]
    pub strategy: Strategy,

    /// Number of concurrent writer tasks, or of in-flight writes with the
    /// semaphore strategy.
    ///
    /// Environment variable: `WRITERS`
    #[arg(long, env = "WRITERS", default_value_t = 500)]
    pub writers: usize,

    /// One-second steps generated per series.
    ///
    /// Environment variable: `POINTS_PER_SERIES`
    #[arg(long, env = "POINTS_PER_SERIES", default_value_t = POINTS_PER_SERIES)]
    pub points_per_series: usize,

    /// Capacity of the queue between the generator and the writers.
    ///
    /// Environment variable: `CHANNEL_CAPACITY`
    #[arg(long, env = "CHANNEL_CAPACITY", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Seed of the value generator.
    ///
    /// Environment variable: `SEED`
    #[arg(long, env = "SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Attempted writes between two progress lines.
    ///
    /// Environment variable: `PROGRESS_INTERVAL`
    #[arg(long, env = "PROGRESS_INTERVAL", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,

    /// Seconds the semaphore strategy waits for a free write slot before
    /// giving up on the run.
    ///
    /// Environment variable: `ACQUIRE_TIMEOUT_SECS`
    #[arg(long, env = "ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub acquire_timeout_secs: u64,

    /// Keep existing data instead of truncating both tables first.
    #[arg(long, default_value_t = false)]
    pub skip_cleanup: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Number of series read concurrently.
    ///
    /// Environment variable: `PARALLEL_READS`
    #[arg(long, env = "PARALLEL_READS", default_value_t = 30)]
    pub parallel_reads: usize,

    /// Rows fetched per page.
    ///
    /// Environment variable: `PAGE_SIZE`
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: i32,
}

/// How to reach the cluster.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub contact_points: Vec<String>,
    pub datacenter: Option<String>,
    pub keyspace: String,
    pub request_timeout: Duration,
    pub page_size: i32,
}

#[derive(Debug, Clone)]
pub enum CommandConfig {
    Write { bench: BenchConfig, cleanup: bool },
    Read(ReadConfig),
    Cleanup,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub log_format: LogFormat,
    pub connection: ConnectionConfig,
    pub command: CommandConfig,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let contact_points: Vec<String> = args
            .contact_points
            .into_iter()
            .map(|node| node.trim().to_string())
            .filter(|node| !node.is_empty())
            .collect();

        if contact_points.is_empty() {
            bail!("CONTACT_POINTS must name at least one node");
        }

        if args.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        let mut page_size = DEFAULT_PAGE_SIZE;

        let command = match args.command {
            Command::Write(write) => {
                if write.writers == 0 {
                    bail!("WRITERS must be greater than 0");
                }
                if write.channel_capacity == 0 {
                    bail!("CHANNEL_CAPACITY must be greater than 0");
                }
                if write.progress_interval == 0 {
                    bail!("PROGRESS_INTERVAL must be greater than 0");
                }
                if write.acquire_timeout_secs == 0 {
                    bail!("ACQUIRE_TIMEOUT_SECS must be greater than 0");
                }
                if (write.series as u64)
                    .checked_mul(write.points_per_series as u64)
                    .is_none()
                {
                    bail!(
                        "SERIES ({}) x POINTS_PER_SERIES ({}) overflows the point counter",
                        write.series,
                        write.points_per_series
                    );
                }

                let bench = BenchConfig::new(write.series, write.writers)
                    .with_points_per_series(write.points_per_series)
                    .with_channel_capacity(write.channel_capacity)
                    .with_seed(write.seed)
                    .with_progress_interval(write.progress_interval)
                    .with_strategy(write.strategy.into())
                    .with_acquire_timeout(Duration::from_secs(write.acquire_timeout_secs));

                CommandConfig::Write {
                    bench,
                    cleanup: !write.skip_cleanup,
                }
            }
            Command::Read(read) => {
                if read.parallel_reads == 0 {
                    bail!("PARALLEL_READS must be greater than 0");
                }
                if read.page_size <= 0 {
                    bail!("PAGE_SIZE must be greater than 0");
                }
                page_size = read.page_size;
                CommandConfig::Read(ReadConfig::new(read.parallel_reads))
            }
            Command::Cleanup => CommandConfig::Cleanup,
        };

        Ok(Self {
            store: args.store,
            log_format: args.log_format,
            connection: ConnectionConfig {
                contact_points,
                datacenter: args.datacenter,
                keyspace: args.keyspace,
                request_timeout: Duration::from_secs(args.request_timeout_secs),
                page_size,
            },
            command,
        })
    }
}
