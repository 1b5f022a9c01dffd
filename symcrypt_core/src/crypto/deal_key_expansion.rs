use hex_literal::hex;

use crate::crypto::bits::{set_bit, BitNumbering};
use crate::crypto::byte_ops::{xor, xor_in_place};
use crate::crypto::cipher_traits::CipherAlgorithm;
use crate::crypto::des::DES;
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;
use crate::crypto::key_extraction::KeyExtraction;

const DEAL_SCHEDULE_KEY: [u8; 8] = hex!("0123456789ABCDEF");

/// Number of Feistel rounds for a DEAL key of `key_len` bytes.
pub fn deal_rounds(key_len: usize) -> Option<usize> {
    match key_len {
        16 | 24 => Some(6),
        32 => Some(8),
        _ => None,
    }
}

/// DEAL schedule: `RK_i = DES_K(K_(i mod s) ^ c_i ^ RK_(i-1))` under a fixed DES key.
///
/// Once every key part has been used, `c_i` sets bit 1, 2, 4 or 8 (LSB-1) in turn.
/// Parity bits are cleared from the finished keys.
pub struct DealKeyExpansion {
    extraction: KeyExtraction,
}

impl DealKeyExpansion {
    pub fn new() -> Self {
        DealKeyExpansion {
            extraction: KeyExtraction::new(8, 4),
        }
    }
}

impl Default for DealKeyExpansion {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyExpansion for DealKeyExpansion {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        let rounds = deal_rounds(key.len()).ok_or(CryptoError::InvalidKeyLength {
            algorithm: "DEAL",
            len: key.len(),
        })?;

        let parts = self.extraction.extract(key)?;
        let des = DES::with_key(&DEAL_SCHEDULE_KEY)?;

        let mut previous = vec![0u8; 8];
        let mut round_keys = Vec::with_capacity(rounds);
        for i in 0..rounds {
            let mut input = xor(&parts[i % parts.len()], &previous)?;
            if i >= parts.len() {
                let mut constant = [0u8; 8];
                set_bit(&mut constant, 1 << (i - parts.len()), BitNumbering::Lsb1)?;
                xor_in_place(&mut input, &constant)?;
            }
            previous = des.encrypt(&input)?;
            round_keys.push(previous.clone());
        }

        for round_key in &mut round_keys {
            round_key.iter_mut().for_each(|b| *b &= 0xFE);
        }
        Ok(round_keys)
    }
}
