use secp256k1::{All, Secp256k1};

use crate::crypto::{contract_address, CryptoError, Keypair};

use super::{Candidate, CandidateSource};

/// Expands each keypair into the contract addresses it would deploy at
/// nonces `0..max_nonce`, before moving to the next keypair.
pub struct ContractSource {
    secp: Secp256k1<All>,
    max_nonce: u64,
    current: Option<Keypair>,
    next_nonce: u64,
}

impl ContractSource {
    /// `max_nonce` is clamped to at least 1.
    pub fn new(max_nonce: u64) -> Self {
        Self {
            secp: Secp256k1::new(),
            max_nonce: max_nonce.max(1),
            current: None,
            next_nonce: 0,
        }
    }

    /// Starts the expansion from a known keypair instead of a random one.
    pub fn with_keypair(max_nonce: u64, keypair: Keypair) -> Self {
        Self {
            current: Some(keypair),
            ..Self::new(max_nonce)
        }
    }

    pub fn max_nonce(&self) -> u64 {
        self.max_nonce
    }
}

impl CandidateSource for ContractSource {
    fn next_candidate(&mut self) -> Result<Candidate, CryptoError> {
        if self.next_nonce >= self.max_nonce {
            self.current = None;
            self.next_nonce = 0;
        }

        let keypair = match &self.current {
            Some(keypair) => keypair.clone(),
            None => {
                let keypair = Keypair::generate(&self.secp)?;
                self.current = Some(keypair.clone());
                keypair
            }
        };

        let nonce = self.next_nonce;
        self.next_nonce += 1;
        let address = contract_address(keypair.address(), nonce);
        Ok(Candidate::new(address, keypair, nonce))
    }
}
