//! Runtime configuration for the best-address search.

use std::time::Duration;

use clap::Parser;

use crate::crypto::Address;
use crate::score::{Criterion, CriterionKind};
use crate::source::SourceMode;

/// Ethereum best-address search
///
/// Prints every keypair whose address beats all previous ones under the
/// chosen criteria, as: address, nonce, private key.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub threads: Option<usize>,

    /// Derive addresses for deployed contracts instead of accounts
    #[arg(short = 'c', long, default_value = "false")]
    pub contract: bool,

    /// Maximum nonce value to test when deriving contract addresses
    #[arg(short = 'm', long, default_value = "32")]
    pub max_nonce: u64,

    /// Scoring functions, comma separated: least, most, ascending,
    /// strictAscending, target
    #[arg(short = 's', long, value_delimiter = ',', default_value = "least")]
    pub scorer: Vec<String>,

    /// Target address for the `target` scorer (40 hex digits, 0x optional)
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "10")]
    pub report_interval: u64,
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub threads: usize,
    pub mode: SourceMode,
    pub criteria: Vec<Criterion>,
    pub report_interval: Duration,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings().map(|_| ())
    }

    /// Resolves the configuration into search parameters.
    pub fn settings(&self) -> Result<SearchSettings, ConfigError> {
        let threads = self.worker_count();
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        let mode = if self.contract {
            if self.max_nonce == 0 {
                return Err(ConfigError::ZeroMaxNonce);
            }
            SourceMode::Contract {
                max_nonce: self.max_nonce,
            }
        } else {
            SourceMode::Account
        };

        Ok(SearchSettings {
            threads,
            mode,
            criteria: self.criteria()?,
            report_interval: Duration::from_secs(self.report_interval.max(1)),
        })
    }

    /// Parses the selected criteria, in the order given, without repeats.
    pub fn criteria(&self) -> Result<Vec<Criterion>, ConfigError> {
        let mut kinds: Vec<CriterionKind> = Vec::new();
        for name in self.scorer.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let kind: CriterionKind = name
                .parse()
                .map_err(|_| ConfigError::UnknownCriterion(name.to_string()))?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        if kinds.is_empty() {
            return Err(ConfigError::NoCriteria);
        }

        let wants_target = kinds.contains(&CriterionKind::Target);
        let target = match (&self.target, wants_target) {
            (Some(hex), true) => Some(
                Address::from_hex(hex.trim())
                    .map_err(|e| ConfigError::InvalidTarget(e.to_string()))?,
            ),
            (None, true) => return Err(ConfigError::MissingTarget),
            (Some(_), false) => return Err(ConfigError::UnusedTarget),
            (None, false) => None,
        };

        kinds
            .into_iter()
            .map(|kind| Criterion::from_kind(kind, target).ok_or(ConfigError::MissingTarget))
            .collect()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid score function '{0}' (expected one of: least, most, ascending, strictAscending, target)")]
    UnknownCriterion(String),

    #[error("No score function selected")]
    NoCriteria,

    #[error("The 'target' score function requires --target")]
    MissingTarget,

    #[error("--target is only used with the 'target' score function")]
    UnusedTarget,

    #[error("Invalid target address: {0}")]
    InvalidTarget(String),

    #[error("Thread count must be at least 1")]
    ZeroThreads,

    #[error("Maximum nonce must be at least 1 in contract mode")]
    ZeroMaxNonce,
}
