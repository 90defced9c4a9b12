//! Candidate production.
//!
//! A [`CandidateSource`] is an endless, lazy producer of candidates. Each call
//! to [`CandidateSource::next_candidate`] does exactly the work needed for one
//! candidate, so callers decide when to stop pulling.

mod account;
mod contract;
mod replay;

pub use account::AccountSource;
pub use contract::ContractSource;
pub use replay::ReplaySource;

use crate::crypto::{Address, CryptoError, Keypair};

/// One generated keypair with one derived address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The address being scored
    pub address: Address,
    /// The key material the address was derived from
    pub keypair: Keypair,
    /// Contract nonce used for the derivation (0 for account addresses)
    pub nonce: u64,
}

impl Candidate {
    pub fn new(address: Address, keypair: Keypair, nonce: u64) -> Self {
        Self {
            address,
            keypair,
            nonce,
        }
    }
}

/// An endless stream of candidates.
pub trait CandidateSource: Send {
    /// Produces the next candidate.
    ///
    /// An error means the key generator itself is broken; the caller must not
    /// retry.
    fn next_candidate(&mut self) -> Result<Candidate, CryptoError>;
}

impl<S: CandidateSource + ?Sized> CandidateSource for Box<S> {
    fn next_candidate(&mut self) -> Result<Candidate, CryptoError> {
        (**self).next_candidate()
    }
}

/// Which addresses to derive from each keypair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// One account address per keypair.
    Account,
    /// `max_nonce` contract addresses per keypair, nonces `0..max_nonce`.
    Contract { max_nonce: u64 },
}

impl SourceMode {
    /// Builds a fresh source for this mode.
    pub fn build(self) -> Box<dyn CandidateSource> {
        match self {
            SourceMode::Account => Box::new(AccountSource::new()),
            SourceMode::Contract { max_nonce } => Box::new(ContractSource::new(max_nonce)),
        }
    }
}
