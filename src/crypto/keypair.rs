//! Ethereum keypair generation.

use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};

use super::{keccak256, Address, CryptoError};

/// Represents an Ethereum keypair (private key + derived account address).
///
/// Immutable once generated; cheap to clone across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypair {
    /// The private key bytes (32 bytes)
    secret_key: [u8; 32],
    /// The derived account address
    address: Address,
}

impl Keypair {
    /// Generates a new random keypair from the OS entropy source.
    ///
    /// Entropy failures are returned as [`CryptoError::Entropy`]. Draws that
    /// are not a valid secp256k1 scalar are discarded and redrawn.
    pub fn generate(secp: &Secp256k1<All>) -> Result<Self, CryptoError> {
        let mut secret_bytes = [0u8; 32];
        loop {
            OsRng.try_fill_bytes(&mut secret_bytes)?;
            if let Ok(secret_key) = SecretKey::from_slice(&secret_bytes) {
                return Ok(Self::from_parts(secp, secret_key));
            }
        }
    }

    /// Builds a keypair from an existing secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let secp = Secp256k1::new();
        let secret_key =
            SecretKey::from_slice(&secret_bytes).map_err(|_| CryptoError::InvalidSecretKey)?;
        Ok(Self::from_parts(&secp, secret_key))
    }

    fn from_parts(secp: &Secp256k1<All>, secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(secp, &secret_key);
        Self {
            secret_key: secret_key.secret_bytes(),
            address: Self::derive_address(&public_key),
        }
    }

    /// Derives an Ethereum address from a secp256k1 public key.
    ///
    /// Hashes the 64-byte uncompressed key (0x04 prefix dropped) and keeps
    /// the last 20 bytes.
    #[inline]
    fn derive_address(public_key: &PublicKey) -> Address {
        let public_key_bytes = public_key.serialize_uncompressed();
        let hash = keccak256(&public_key_bytes[1..]);

        let mut address_bytes = [0u8; 20];
        address_bytes.copy_from_slice(&hash[12..]);
        Address::from_bytes(address_bytes)
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }

    /// Returns the private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.secret_key
    }

    /// Returns the account address of this keypair.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}
