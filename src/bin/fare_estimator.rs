//! fare-estimator CLI
//!
//! Usage:
//!   fare-estimator <input.csv> [--output <file|->] [--workers N]
//!
//! Reads GPS samples, prices every delivery and writes
//! `id_delivery,fare_estimate` rows.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fare_estimator::config::{parse_idle_billing, parse_time_zone, EstimatorConfig};
use fare_estimator::io::{read_points_from_path, write_fares, write_fares_to_path};
use fare_estimator::{group_by_delivery, BatchScheduler, IdleBilling};

#[derive(Parser, Debug)]
#[command(author, version, about = "Estimate delivery fares from GPS samples", long_about = None)]
struct Cli {
    /// CSV of id_delivery,lat,lng,timestamp rows
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = "output.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Worker threads (overrides FARE_WORKERS)
    #[arg(short, long)]
    workers: Option<usize>,

    /// IANA zone used for the day/night split (overrides FARE_TIMEZONE)
    #[arg(long)]
    timezone: Option<String>,

    /// How idle segments combine with the running fare: replace or accumulate
    #[arg(long, value_parser = parse_idle_billing)]
    idle_billing: Option<IdleBilling>,

    /// Disable the shared distance cache
    #[arg(long)]
    no_cache: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = build_config(&cli)?;
    run(&cli.input, &cli.output, &config)
}

fn build_config(cli: &Cli) -> Result<EstimatorConfig> {
    let mut config = EstimatorConfig::from_env().context("invalid FARE_* environment")?;
    if let Some(workers) = cli.workers {
        if workers == 0 {
            bail!("--workers must be at least 1");
        }
        config.workers = workers;
    }
    if let Some(zone) = &cli.timezone {
        config.fare.time_zone = parse_time_zone(zone)?;
    }
    if let Some(billing) = cli.idle_billing {
        config.fare.idle_billing = billing;
    }
    if cli.no_cache {
        config.cache_distances = false;
    }
    Ok(config)
}

fn run(input: &Path, output: &Path, config: &EstimatorConfig) -> Result<()> {
    let started = Instant::now();

    let points = read_points_from_path(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let deliveries = group_by_delivery(points);

    let fares = BatchScheduler::from_config(config)
        .run(&deliveries)
        .context("fare computation failed")?;

    if output.as_os_str() == "-" {
        write_fares(&fares, io::stdout().lock()).context("failed to write fares to stdout")?;
    } else {
        write_fares_to_path(&fares, output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(path = %output.display(), "fare estimates written");
    }

    info!(
        deliveries = fares.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}
