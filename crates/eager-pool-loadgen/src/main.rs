#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, LoadgenConfig};
use core::time::Duration;
use eager_pool::EagerPool;
use rand::Rng;
use std::thread;
use std::time::Instant;
use telemetry::init_telemetry;

/// Payload submitted on every tick.
const MESSAGE: &str = "Working...";

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = LoadgenConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let max_job_secs = config.max_job_secs;
    let pool = EagerPool::from_config(config.pool.clone(), move |msg: String| {
        tracing::info!("{msg}");
        let secs = rand::rng().random_range(1..=max_job_secs);
        thread::sleep(Duration::from_secs(secs));
    })?;

    run(&pool, &config);
    Ok(())
}

/// Submits messages until the configured count is reached, or forever.
fn run(pool: &EagerPool<String>, config: &LoadgenConfig) {
    let mut sent = 0_u64;
    let mut sent_in_window = 0_u64;
    let mut window_start = Instant::now();

    while config.messages.is_none_or(|limit| sent < limit) {
        pool.submit(MESSAGE.to_owned());
        sent += 1;
        sent_in_window += 1;

        if window_start.elapsed() >= Duration::from_secs(1) {
            tracing::info!(
                "Messages sent: {sent_in_window} ({}/{} workers busy)",
                pool.busy_count(),
                pool.len()
            );
            window_start = Instant::now();
            sent_in_window = 0;
        }

        if !config.interval.is_zero() {
            thread::sleep(config.interval);
        }
    }

    tracing::info!("Submitted {sent} messages, abandoning in-flight jobs");
}

fn log_startup_info(config: &LoadgenConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting load generator with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting load generator with {} workers",
            config.pool.num_workers
        );
    }
}
