//! # best_vanity
//!
//! Searches random Ethereum keypairs for the address that scores best under
//! one or more criteria, reporting every improvement as soon as it is found.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation and account/contract address derivation
//! - `source`: Endless candidate streams (account or contract mode)
//! - `score`: Comparison criteria and best-so-far records
//! - `worker`: Worker pool, local filtering, and the global aggregator
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod score;
pub mod source;
pub mod worker;

pub use config::{Config, ConfigError, SearchSettings};
pub use crypto::{Address, CryptoError, Keypair};
pub use score::{BestBoard, Criterion, CriterionKind};
pub use source::{Candidate, CandidateSource, SourceMode};
pub use worker::{Aggregator, Report, ReportSink, SearchError, StdoutSink, WorkerPool};
