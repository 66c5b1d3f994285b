use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use eager_pool::PoolConfig;

/// Runtime configuration for the `eager-pool-loadgen` binary.
///
/// Every value can be given on the command line or through the environment
/// (including a `.env` file in the working directory).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "eager-pool-loadgen",
    version,
    about = "Feeds synthetic messages into an eager worker pool"
)]
pub struct CliArgs {
    /// Number of worker threads in the pool.
    ///
    /// The default is one message per second times the longest simulated
    /// job, so the default load never runs out of idle workers.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 10)]
    pub num_workers: usize,

    /// Capacity of each worker's queue.
    ///
    /// Only used once every worker is busy, when messages are buffered
    /// round-robin. A full queue blocks the generator until the worker catches
    /// up.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 3)]
    pub queue_capacity: usize,

    /// Delay between two submissions, in milliseconds.
    ///
    /// Environment variable: `INTERVAL_MS`
    #[arg(long, env = "INTERVAL_MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Upper bound of the simulated processing time, in seconds.
    ///
    /// Each job sleeps for a random duration between 1 and this value.
    ///
    /// Environment variable: `MAX_JOB_SECS`
    #[arg(long, env = "MAX_JOB_SECS", default_value_t = 10)]
    pub max_job_secs: u64,

    /// Stop after submitting this many messages. Runs forever if unset.
    ///
    /// Environment variable: `MESSAGES`
    #[arg(long, env = "MESSAGES")]
    pub messages: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct LoadgenConfig {
    pub pool: PoolConfig,
    pub interval: Duration,
    pub max_job_secs: u64,
    pub messages: Option<u64>,
}

impl TryFrom<CliArgs> for LoadgenConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_job_secs == 0 {
            bail!("MAX_JOB_SECS must be greater than 0");
        }

        let pool = PoolConfig::new(args.num_workers, args.queue_capacity);
        pool.validate()?;

        Ok(Self {
            pool,
            interval: Duration::from_millis(args.interval_ms),
            max_job_secs: args.max_job_secs,
            messages: args.messages,
        })
    }
}
