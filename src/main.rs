//! Ethereum best-address search CLI
//!
//! Usage:
//!   best_vanity                        # Lowest account address
//!   best_vanity -s ascending -w 8      # Longest ascending nibble run
//!   best_vanity -c -m 16 -s most       # Highest contract address, nonces 0..16
//!   best_vanity -s target -t 0xdead... # Closest to a target address

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use best_vanity::{Aggregator, Config, SearchError, SearchSettings, StdoutSink, WorkerPool};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&settings) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(settings: &SearchSettings) -> Result<(), SearchError> {
    let criteria: Vec<String> = settings.criteria.iter().map(|c| c.to_string()).collect();
    info!(
        workers = settings.threads,
        mode = ?settings.mode,
        criteria = %criteria.join(","),
        "starting search (press Ctrl+C to stop)"
    );

    let pool = WorkerPool::new(settings.threads, &settings.criteria, settings.mode)?;
    ctrlc_handler(pool.stop_flag_clone());

    let mut aggregator = Aggregator::new(&settings.criteria);
    let mut sink = StdoutSink::new(settings.criteria.len() > 1);
    let outcome = pool.drive(&mut aggregator, &mut sink, settings.report_interval);

    info!(
        candidates = pool.total_candidates(),
        forwarded = pool.total_forwarded(),
        reports = aggregator.reported(),
        elapsed_secs = pool.elapsed().as_secs_f64(),
        rate = pool.candidates_per_second() as u64,
        "search finished"
    );
    for record in aggregator.board().records() {
        if let Some(best) = record.best() {
            info!(
                criterion = %record.criterion(),
                address = %best.address,
                nonce = best.nonce,
                score = ?record.best_score(),
                "best"
            );
        }
    }

    let joined = pool.join();
    outcome?;
    joined
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    }) {
        warn!("Error setting Ctrl-C handler: {}", e);
    }
}
