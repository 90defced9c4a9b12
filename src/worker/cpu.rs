//! CPU worker: generates candidates and forwards local records.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, error};

use crate::crypto::CryptoError;
use crate::score::{BestBoard, Criterion};
use crate::source::CandidateSource;

use super::WorkerEvent;

/// Statistics shared by all workers of a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total candidates generated
    pub candidates_generated: AtomicU64,
    /// Candidates forwarded to the aggregator
    pub candidates_forwarded: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total candidates generated.
    pub fn total_candidates(&self) -> u64 {
        self.candidates_generated.load(Ordering::Relaxed)
    }

    /// Returns the total candidates forwarded.
    pub fn total_forwarded(&self) -> u64 {
        self.candidates_forwarded.load(Ordering::Relaxed)
    }
}

/// Outcome of processing a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not a local record
    Discarded,
    /// Local record, sent to the aggregator
    Forwarded,
    /// Local record, but the aggregator is gone
    Disconnected,
}

enum Halt {
    Disconnected,
    Fault(CryptoError),
}

/// A worker that pulls candidates from its own source and forwards only
/// those that improve (or tie) one of its local records.
pub struct CpuWorker<S> {
    /// Worker ID
    id: usize,
    /// Where candidates come from
    source: S,
    /// Local best per criterion, owned by this worker alone
    board: BestBoard,
    /// Channel into the aggregator
    event_tx: Sender<WorkerEvent>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl<S: CandidateSource> CpuWorker<S> {
    /// Creates a new CPU worker with an empty local board.
    pub fn new(
        id: usize,
        source: S,
        criteria: &[Criterion],
        event_tx: Sender<WorkerEvent>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            source,
            board: BestBoard::new(criteria),
            event_tx,
            stop_flag,
            stats,
        }
    }

    /// Generates one candidate and forwards it if it is a local record.
    ///
    /// A candidate improving several criteria is forwarded once.
    pub fn step(&mut self) -> Result<Step, CryptoError> {
        let candidate = self.source.next_candidate()?;
        if !self.board.offer(&candidate).is_improvement() {
            return Ok(Step::Discarded);
        }

        let event = WorkerEvent::Candidate {
            worker_id: self.id,
            candidate,
        };
        match self.event_tx.send(event) {
            Ok(()) => Ok(Step::Forwarded),
            Err(_) => Ok(Step::Disconnected),
        }
    }

    /// Runs the worker loop.
    ///
    /// Runs until the stop flag is set, the aggregator hangs up, or key
    /// generation fails. A failure is forwarded as [`WorkerEvent::Fault`].
    pub fn run(mut self) {
        // Process in batches to reduce atomic operation overhead
        const BATCH_SIZE: u64 = 1000;

        debug!(worker = self.id, "worker started");

        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            let mut generated = 0;
            let mut forwarded = 0;
            let mut halt = None;
            for _ in 0..BATCH_SIZE {
                match self.step() {
                    Ok(Step::Discarded) => generated += 1,
                    Ok(Step::Forwarded) => {
                        generated += 1;
                        forwarded += 1;
                    }
                    Ok(Step::Disconnected) => {
                        generated += 1;
                        halt = Some(Halt::Disconnected);
                        break;
                    }
                    Err(e) => {
                        halt = Some(Halt::Fault(e));
                        break;
                    }
                }
            }

            self.stats
                .candidates_generated
                .fetch_add(generated, Ordering::Relaxed);
            self.stats
                .candidates_forwarded
                .fetch_add(forwarded, Ordering::Relaxed);

            match halt {
                None => {}
                Some(Halt::Disconnected) => {
                    debug!(worker = self.id, "aggregator disconnected");
                    break;
                }
                Some(Halt::Fault(error)) => {
                    error!(worker = self.id, %error, "key generation failed");
                    let _ = self.event_tx.send(WorkerEvent::Fault {
                        worker_id: self.id,
                        error,
                    });
                    break;
                }
            }
        }

        debug!(worker = self.id, "worker stopped");
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the worker's local records.
    pub fn board(&self) -> &BestBoard {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Address, Keypair};
    use crate::source::{Candidate, ReplaySource};
    use crossbeam_channel::unbounded;

    fn candidates(first_bytes: &[u8]) -> Vec<Candidate> {
        let mut secret = [0u8; 32];
        secret[31] = 9;
        let keypair = Keypair::from_secret_key(secret).unwrap();
        first_bytes
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let mut bytes = [0u8; 20];
                bytes[0] = *b;
                Candidate::new(Address::from_bytes(bytes), keypair.clone(), i as u64)
            })
            .collect()
    }

    fn worker(
        list: Vec<Candidate>,
        criteria: &[Criterion],
    ) -> (
        CpuWorker<ReplaySource>,
        crossbeam_channel::Receiver<WorkerEvent>,
    ) {
        let (tx, rx) = unbounded();
        let worker = CpuWorker::new(
            0,
            ReplaySource::new(list).unwrap(),
            criteria,
            tx,
            Arc::new(AtomicBool::new(false)),
            Arc::new(WorkerStats::new()),
        );
        (worker, rx)
    }

    fn forwarded_nonces(rx: &crossbeam_channel::Receiver<WorkerEvent>) -> Vec<u64> {
        rx.try_iter()
            .map(|event| match event {
                WorkerEvent::Candidate { candidate, .. } => candidate.nonce,
                WorkerEvent::Fault { .. } => panic!("unexpected fault"),
            })
            .collect()
    }

    #[test]
    fn test_forwards_only_local_records() {
        let (mut worker, rx) = worker(candidates(&[5, 7, 3, 4, 1, 9]), &[Criterion::Least]);
        let steps: Vec<Step> = (0..6).map(|_| worker.step().unwrap()).collect();
        assert_eq!(
            steps,
            vec![
                Step::Forwarded,
                Step::Discarded,
                Step::Forwarded,
                Step::Discarded,
                Step::Forwarded,
                Step::Discarded,
            ]
        );
        assert_eq!(forwarded_nonces(&rx), vec![0, 2, 4]);
    }

    #[test]
    fn test_forwards_once_for_several_criteria() {
        let (mut worker, rx) = worker(
            candidates(&[5, 7, 3]),
            &[Criterion::Least, Criterion::Most, Criterion::Ascending],
        );
        for _ in 0..3 {
            worker.step().unwrap();
        }
        // The first candidate improves all three criteria but is sent once.
        assert_eq!(forwarded_nonces(&rx), vec![0, 1, 2]);
    }

    #[test]
    fn test_forwarded_scores_never_decrease() {
        let bytes: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
        let (mut worker, rx) = worker(candidates(&bytes), &[Criterion::Most]);
        for _ in 0..bytes.len() {
            worker.step().unwrap();
        }
        let firsts: Vec<u8> = rx
            .try_iter()
            .map(|event| match event {
                WorkerEvent::Candidate { candidate, .. } => candidate.address.as_bytes()[0],
                WorkerEvent::Fault { .. } => panic!("unexpected fault"),
            })
            .collect();
        assert!(firsts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*firsts.last().unwrap(), *bytes.iter().max().unwrap());
    }

    #[test]
    fn test_disconnected_aggregator() {
        let (mut worker, rx) = worker(candidates(&[1]), &[Criterion::Least]);
        drop(rx);
        assert_eq!(worker.step().unwrap(), Step::Disconnected);
    }

    #[test]
    fn test_run_stops_on_flag() {
        let (tx, rx) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(WorkerStats::new());
        let worker = CpuWorker::new(
            3,
            ReplaySource::new(candidates(&[1, 2])).unwrap(),
            &[Criterion::Least],
            tx,
            stop_flag,
            stats.clone(),
        );
        worker.run();
        assert_eq!(stats.total_candidates(), 0);
        assert!(rx.try_recv().is_err());
    }
}
