use crate::crypto::byte_ops::{words_from_le, words_to_le};
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;
use crate::crypto::serpent::{apply_sbox, Words, SBOX, SERPENT_ROUNDS};

const PHI: u32 = 0x9E37_79B9;
const MAX_KEY_SIZE: usize = 32;

/// Serpent's native schedule: 132 prekey words from a linear recurrence, then
/// each group of four through S-box `(3 - i) mod 8`, giving 33 16-byte keys.
///
/// Keys shorter than 256 bits get a single `1` bit appended before zero fill.
pub struct SerpentKeyExpansion;

impl KeyExpansion for SerpentKeyExpansion {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        if key.is_empty() || key.len() > MAX_KEY_SIZE || key.len() % 4 != 0 {
            return Err(CryptoError::InvalidKeyLength {
                algorithm: "SERPENT",
                len: key.len(),
            });
        }

        let mut padded = [0u8; MAX_KEY_SIZE];
        padded[..key.len()].copy_from_slice(key);
        if key.len() < MAX_KEY_SIZE {
            padded[key.len()] = 0x01;
        }

        let total = 4 * (SERPENT_ROUNDS + 1);
        let mut w = words_from_le(&padded)?;
        w.reserve(total);
        for i in 0..total {
            let j = i + 8;
            let next = (w[j - 8] ^ w[j - 5] ^ w[j - 3] ^ w[j - 1] ^ PHI ^ i as u32).rotate_left(11);
            w.push(next);
        }

        let prekeys = &w[8..];
        Ok((0..=SERPENT_ROUNDS)
            .map(|i| {
                let mut group: Words = [
                    prekeys[4 * i],
                    prekeys[4 * i + 1],
                    prekeys[4 * i + 2],
                    prekeys[4 * i + 3],
                ];
                apply_sbox(&SBOX[(3 + 8 - i % 8) % 8], &mut group);
                words_to_le(&group)
            })
            .collect())
    }
}
