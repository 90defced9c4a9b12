use crate::crypto::CryptoError;

use super::{Candidate, CandidateSource};

/// Replays a fixed list of candidates, starting over at the end.
///
/// Scores depend only on addresses, so replaying the same list always
/// reproduces the same sequence of records.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    candidates: Vec<Candidate>,
    position: usize,
}

impl ReplaySource {
    /// Returns `None` for an empty list, which could never yield a candidate.
    pub fn new(candidates: Vec<Candidate>) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            candidates,
            position: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateSource for ReplaySource {
    fn next_candidate(&mut self) -> Result<Candidate, CryptoError> {
        let candidate = self.candidates[self.position].clone();
        self.position = (self.position + 1) % self.candidates.len();
        Ok(candidate)
    }
}
