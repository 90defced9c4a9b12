use secp256k1::{All, Secp256k1};

use crate::crypto::{CryptoError, Keypair};

use super::{Candidate, CandidateSource};

/// Yields one account-address candidate per freshly generated keypair.
pub struct AccountSource {
    secp: Secp256k1<All>,
}

impl AccountSource {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for AccountSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for AccountSource {
    #[inline]
    fn next_candidate(&mut self) -> Result<Candidate, CryptoError> {
        let keypair = Keypair::generate(&self.secp)?;
        Ok(Candidate::new(*keypair.address(), keypair, 0))
    }
}
