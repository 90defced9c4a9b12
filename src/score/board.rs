//! Best-so-far tracking, one record per criterion.

use crate::source::Candidate;

use super::Criterion;

/// The best candidate seen so far under one criterion.
#[derive(Debug, Clone)]
pub struct BestRecord {
    criterion: Criterion,
    best: Option<Candidate>,
}

impl BestRecord {
    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    /// The integer score of the current best, if the criterion has one.
    pub fn best_score(&self) -> Option<u32> {
        self.best
            .as_ref()
            .and_then(|c| self.criterion.score(&c.address))
    }
}

/// Criteria a single candidate improved on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Improvement {
    criteria: Vec<&'static str>,
}

impl Improvement {
    #[inline]
    pub fn is_improvement(&self) -> bool {
        !self.criteria.is_empty()
    }

    pub fn criteria(&self) -> &[&'static str] {
        &self.criteria
    }
}

/// Best-so-far records for a set of criteria within one scope.
///
/// Owned by exactly one thread: each worker holds its own board, and the
/// aggregator holds the global one.
#[derive(Debug, Clone)]
pub struct BestBoard {
    records: Vec<BestRecord>,
}

impl BestBoard {
    /// Creates an empty board. Criteria repeating an earlier name are dropped.
    pub fn new(criteria: &[Criterion]) -> Self {
        let mut records: Vec<BestRecord> = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            if records.iter().all(|r| r.criterion.name() != criterion.name()) {
                records.push(BestRecord {
                    criterion: *criterion,
                    best: None,
                });
            }
        }
        Self { records }
    }

    /// Offers a candidate to every record.
    ///
    /// A record with no best yet, or whose best the candidate ties or beats,
    /// is replaced. Returns the criteria that were updated.
    pub fn offer(&mut self, candidate: &Candidate) -> Improvement {
        let mut improvement = Improvement::default();
        for record in &mut self.records {
            let improves = match &record.best {
                None => true,
                Some(best) => record
                    .criterion
                    .at_least_as_good(&candidate.address, &best.address),
            };
            if improves {
                record.best = Some(candidate.clone());
                improvement.criteria.push(record.criterion.name());
            }
        }
        improvement
    }

    pub fn records(&self) -> &[BestRecord] {
        &self.records
    }

    pub fn criteria(&self) -> impl Iterator<Item = &Criterion> + '_ {
        self.records.iter().map(|r| &r.criterion)
    }

    /// Looks up a record by criterion name.
    pub fn record(&self, name: &str) -> Option<&BestRecord> {
        self.records.iter().find(|r| r.criterion.name() == name)
    }

    pub fn best(&self, name: &str) -> Option<&Candidate> {
        self.record(name).and_then(BestRecord::best)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
