//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use tracing::{debug, info};

use crate::score::Criterion;
use crate::source::{CandidateSource, SourceMode};

use super::cpu::{CpuWorker, WorkerStats};
use super::{Aggregator, ReportSink, SearchError, WorkerEvent};

/// Manages a pool of workers feeding one unbounded event channel.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for forwarded candidates
    event_rx: Receiver<WorkerEvent>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a pool of `num_workers` workers generating candidates in `mode`.
    pub fn new(
        num_workers: usize,
        criteria: &[Criterion],
        mode: SourceMode,
    ) -> Result<Self, SearchError> {
        Self::with_sources(num_workers, criteria, move |_| mode.build())
    }

    /// Creates a pool whose worker `id` pulls from `make_source(id)`.
    pub fn with_sources<S, F>(
        num_workers: usize,
        criteria: &[Criterion],
        make_source: F,
    ) -> Result<Self, SearchError>
    where
        S: CandidateSource + 'static,
        F: Fn(usize) -> S,
    {
        let (event_tx, event_rx) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let mut pool = Self {
            num_workers,
            handles: Some(Vec::with_capacity(num_workers)),
            event_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        };

        for id in 0..num_workers {
            let worker = CpuWorker::new(
                id,
                make_source(id),
                criteria,
                event_tx.clone(),
                pool.stop_flag.clone(),
                pool.stats.clone(),
            );

            // On failure, dropping `pool` stops and joins the workers spawned so far.
            let handle = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run())
                .map_err(SearchError::Spawn)?;
            if let Some(handles) = pool.handles.as_mut() {
                handles.push(handle);
            }
        }

        debug!(workers = num_workers, "worker pool started");
        Ok(pool)
    }

    /// Waits for a forwarded candidate with a timeout.
    ///
    /// Returns `None` on timeout or once every worker has exited.
    pub fn wait_for_event(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Runs the aggregator on this pool's events until the pool is stopped,
    /// every worker exits, or a worker reports a fault.
    ///
    /// Progress is logged every `progress_interval`.
    pub fn drive<K>(
        &self,
        aggregator: &mut Aggregator,
        sink: &mut K,
        progress_interval: Duration,
    ) -> Result<(), SearchError>
    where
        K: ReportSink + ?Sized,
    {
        let poll = progress_interval.min(Duration::from_millis(250));
        let mut last_progress = Instant::now();

        while !self.is_stopped() {
            match self.event_rx.recv_timeout(poll) {
                Ok(event) => {
                    let report = aggregator.handle(event).map_err(|e| {
                        self.stop();
                        e
                    })?;
                    if let Some(report) = report {
                        sink.emit(&report)?;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_progress.elapsed() >= progress_interval {
                self.log_progress(aggregator);
                last_progress = Instant::now();
            }
        }

        Ok(())
    }

    fn log_progress(&self, aggregator: &Aggregator) {
        info!(
            elapsed_secs = self.elapsed().as_secs(),
            candidates = self.total_candidates(),
            rate = self.candidates_per_second() as u64,
            reports = aggregator.reported(),
            "searching"
        );
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops and waits for all workers to complete.
    pub fn join(mut self) -> Result<(), SearchError> {
        self.join_workers()
    }

    fn join_workers(&mut self) -> Result<(), SearchError> {
        self.stop();
        let mut result = Ok(());
        if let Some(handles) = self.handles.take() {
            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && result.is_ok() {
                    result = Err(SearchError::WorkerPanicked(id));
                }
            }
        }
        result
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the total candidates generated across all workers.
    pub fn total_candidates(&self) -> u64 {
        self.stats.total_candidates()
    }

    /// Returns the total candidates forwarded to the aggregator.
    pub fn total_forwarded(&self) -> u64 {
        self.stats.total_forwarded()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (candidates per second).
    pub fn candidates_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_candidates() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let _ = self.join_workers();
    }
}
