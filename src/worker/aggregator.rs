//! The global filter.

use tracing::debug;

use crate::score::{BestBoard, Criterion};
use crate::source::Candidate;

use super::{Report, ReportSink, SearchError, WorkerEvent};

/// Owns the global best per criterion and turns forwarded candidates into
/// reports, strictly in arrival order.
#[derive(Debug)]
pub struct Aggregator {
    board: BestBoard,
    received: u64,
    reported: u64,
}

impl Aggregator {
    pub fn new(criteria: &[Criterion]) -> Self {
        Self {
            board: BestBoard::new(criteria),
            received: 0,
            reported: 0,
        }
    }

    /// Offers one candidate to the global board.
    ///
    /// Returns a report when it improves or ties at least one global record.
    pub fn observe(&mut self, worker_id: usize, candidate: Candidate) -> Option<Report> {
        self.received += 1;
        let improvement = self.board.offer(&candidate);
        if !improvement.is_improvement() {
            return None;
        }

        self.reported += 1;
        let improved = improvement
            .criteria()
            .iter()
            .map(|name| {
                let score = self
                    .board
                    .record(name)
                    .and_then(|record| record.criterion().score(&candidate.address));
                (*name, score)
            })
            .collect();
        debug!(worker = worker_id, address = %candidate.address, "global improvement");

        Some(Report {
            candidate,
            worker_id,
            improved,
        })
    }

    /// Handles one worker event. A worker fault ends the search.
    pub fn handle(&mut self, event: WorkerEvent) -> Result<Option<Report>, SearchError> {
        match event {
            WorkerEvent::Candidate {
                worker_id,
                candidate,
            } => Ok(self.observe(worker_id, candidate)),
            WorkerEvent::Fault { worker_id, error } => Err(SearchError::KeyGeneration {
                worker_id,
                source: error,
            }),
        }
    }

    /// Feeds every event into the board, emitting each report to `sink`,
    /// until the events run out or one of them is a fault.
    pub fn consume<I, K>(&mut self, events: I, sink: &mut K) -> Result<(), SearchError>
    where
        I: IntoIterator<Item = WorkerEvent>,
        K: ReportSink + ?Sized,
    {
        for event in events {
            if let Some(report) = self.handle(event)? {
                sink.emit(&report)?;
            }
        }
        Ok(())
    }

    /// Returns the global records.
    pub fn board(&self) -> &BestBoard {
        &self.board
    }

    /// Candidates received from workers.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Reports emitted.
    pub fn reported(&self) -> u64 {
        self.reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Address, CryptoError, Keypair};

    fn candidate(first: u8, nonce: u64) -> Candidate {
        let mut secret = [0u8; 32];
        secret[31] = 5;
        let keypair = Keypair::from_secret_key(secret).unwrap();
        let mut bytes = [0x55u8; 20];
        bytes[0] = first;
        Candidate::new(Address::from_bytes(bytes), keypair, nonce)
    }

    fn event(worker_id: usize, first: u8) -> WorkerEvent {
        WorkerEvent::Candidate {
            worker_id,
            candidate: candidate(first, first as u64),
        }
    }

    #[test]
    fn test_reports_only_global_improvements() {
        let mut aggregator = Aggregator::new(&[Criterion::Most]);
        let mut reports: Vec<Report> = Vec::new();

        // Two workers whose local records interleave.
        let events = vec![event(0, 0x10), event(1, 0x08), event(1, 0x20), event(0, 0x18)];
        aggregator.consume(events, &mut reports).unwrap();

        let firsts: Vec<u8> = reports.iter().map(|r| r.address().as_bytes()[0]).collect();
        assert_eq!(firsts, vec![0x10, 0x20]);
        assert_eq!(reports[1].worker_id, 1);
        assert_eq!(aggregator.received(), 4);
        assert_eq!(aggregator.reported(), 2);
    }

    #[test]
    fn test_report_lists_improved_criteria() {
        let mut aggregator = Aggregator::new(&[Criterion::Least, Criterion::Ascending]);
        // 0x45 followed by 0x55 bytes is non-decreasing throughout.
        let first = aggregator.observe(0, candidate(0x45, 0)).unwrap();
        assert_eq!(first.improved, vec![("least", None), ("ascending", Some(40))]);

        // Lower but with a shorter run: only `least` improves.
        let second = aggregator.observe(0, candidate(0x30, 1)).unwrap();
        assert_eq!(second.improved, vec![("least", None)]);

        assert!(aggregator.observe(0, candidate(0x90, 2)).is_none());
    }

    #[test]
    fn test_fault_ends_consumption() {
        let mut aggregator = Aggregator::new(&[Criterion::Least]);
        let mut reports: Vec<Report> = Vec::new();
        let events = vec![
            event(0, 0x10),
            WorkerEvent::Fault {
                worker_id: 2,
                error: CryptoError::InvalidSecretKey,
            },
            event(0, 0x01),
        ];

        let err = aggregator.consume(events, &mut reports).unwrap_err();
        assert!(matches!(err, SearchError::KeyGeneration { worker_id: 2, .. }));
        assert_eq!(reports.len(), 1);
    }
}
