//! Key generation and address derivation.
//!
//! - Account address: keccak256(uncompressed pubkey without 0x04)[12..32]
//! - Contract address (CREATE): keccak256(rlp([sender, nonce]))[12..32]

mod address;
mod contract;
mod keypair;

pub use address::{Address, ADDRESS_NIBBLES};
pub use contract::contract_address;
pub use keypair::Keypair;

use tiny_keccak::{Hasher, Keccak};

/// Errors raised while producing key material.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The OS entropy source failed. Never retried.
    #[error("entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Keccak-256 of arbitrary bytes (output 32 bytes).
#[inline]
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
