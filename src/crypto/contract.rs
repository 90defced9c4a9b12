//! Contract address computation (CREATE).
//!
//! address = keccak256(rlp([sender, nonce]))[12..32]

use super::{keccak256, Address};

/// Computes the address of the contract `sender` deploys at `nonce`.
///
/// Preimage: list header (1) || 0x94 || sender (20) || rlp(nonce) (1..=9),
/// at most 31 bytes, so the short list form always applies.
pub fn contract_address(sender: &Address, nonce: u64) -> Address {
    let mut preimage = [0u8; 31];
    preimage[1] = 0x80 + 20;
    preimage[2..22].copy_from_slice(sender.as_bytes());

    let len = 22 + encode_nonce(nonce, &mut preimage[22..]);
    preimage[0] = 0xc0 + (len - 1) as u8;

    let hash = keccak256(&preimage[..len]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::from_bytes(addr)
}

/// Writes the RLP encoding of `nonce` into `out`, returning its length.
#[inline]
fn encode_nonce(nonce: u64, out: &mut [u8]) -> usize {
    match nonce {
        0 => {
            out[0] = 0x80;
            1
        }
        1..=0x7f => {
            out[0] = nonce as u8;
            1
        }
        _ => {
            let be = nonce.to_be_bytes();
            let skip = (nonce.leading_zeros() / 8) as usize;
            let body = &be[skip..];
            out[0] = 0x80 + body.len() as u8;
            out[1..=body.len()].copy_from_slice(body);
            body.len() + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Address {
        Address::from_hex("6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0").unwrap()
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(
            contract_address(&sender(), 0).to_hex(),
            "cd234a471b72ba2f1ccf0a70fcaba648a5eecd8d"
        );
        assert_eq!(
            contract_address(&sender(), 1).to_hex(),
            "343c43a37d37dff08ae8c4a11544c718abb4fcf8"
        );
        assert_eq!(
            contract_address(&sender(), 2).to_hex(),
            "f778b86fa74e846c4f0a1fbd1335fe81c00a0c91"
        );
    }

    #[test]
    fn test_nonce_encoding() {
        let mut buf = [0u8; 9];
        assert_eq!(encode_nonce(0, &mut buf), 1);
        assert_eq!(buf[0], 0x80);

        assert_eq!(encode_nonce(0x7f, &mut buf), 1);
        assert_eq!(buf[0], 0x7f);

        assert_eq!(encode_nonce(0x80, &mut buf), 2);
        assert_eq!(&buf[..2], &[0x81, 0x80]);

        assert_eq!(encode_nonce(0x0400, &mut buf), 3);
        assert_eq!(&buf[..3], &[0x82, 0x04, 0x00]);

        assert_eq!(encode_nonce(u64::MAX, &mut buf), 9);
        assert_eq!(buf[0], 0x88);
    }

    #[test]
    fn test_distinct_nonces_distinct_addresses() {
        let a = contract_address(&sender(), 127);
        let b = contract_address(&sender(), 128);
        assert_ne!(a, b);
        assert_eq!(a, contract_address(&sender(), 127));
    }
}
