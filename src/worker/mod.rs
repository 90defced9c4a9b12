//! Parallel search: workers filter locally, the aggregator filters globally.
//!
//! - `CpuWorker`: one thread, one candidate source, one local board
//! - `WorkerPool`: spawns workers and owns the many-to-one event channel
//! - `Aggregator`: the single owner of the global board
//! - `ReportSink`: where global improvements are written

mod aggregator;
mod cpu;
mod pool;
mod report;

pub use aggregator::Aggregator;
pub use cpu::{CpuWorker, Step, WorkerStats};
pub use pool::WorkerPool;
pub use report::{Report, ReportSink, StdoutSink};

use crate::crypto::CryptoError;
use crate::source::Candidate;

/// A message from a worker to the aggregator.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A candidate that improved one of the worker's local records.
    Candidate { worker_id: usize, candidate: Candidate },
    /// The worker's key generator failed; the worker has exited.
    Fault { worker_id: usize, error: CryptoError },
}

/// Errors that end a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("worker {worker_id}: key generation failed: {source}")]
    KeyGeneration {
        worker_id: usize,
        source: CryptoError,
    },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("failed to write result: {0}")]
    Output(#[from] std::io::Error),
}
