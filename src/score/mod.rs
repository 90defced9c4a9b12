//! Scoring of candidate addresses.
//!
//! - `Criterion`: the pure comparison functions (least, most, ascending,
//!   strictAscending, target)
//! - `BestBoard`: the best candidate seen so far for each tracked criterion,
//!   used both inside each worker and by the aggregator

mod board;
mod criterion;

pub use board::{BestBoard, BestRecord, Improvement};
pub use criterion::{ascending_run, shared_prefix, Criterion, CriterionKind};
