//! Serpent: 32-round substitution-permutation network over four little-endian
//! 32-bit words, with bit-sliced 4-bit S-boxes.

use std::sync::Arc;

use crate::crypto::byte_ops::{words_from_le, words_to_le};
use crate::crypto::cipher_traits::{CipherAlgorithm, SymmetricCipher, SymmetricCipherWithRounds};
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;
use crate::crypto::serpent_key_expansion::SerpentKeyExpansion;

pub const SERPENT_BLOCK_SIZE: usize = 16;
pub const SERPENT_ROUNDS: usize = 32;

pub(crate) type Words = [u32; 4];

pub(crate) const SBOX: [[u8; 16]; 8] = [
    [3, 8, 15, 1, 10, 6, 5, 11, 14, 13, 4, 2, 7, 0, 9, 12],
    [15, 12, 2, 7, 9, 0, 5, 10, 1, 11, 14, 8, 6, 13, 3, 4],
    [8, 6, 7, 9, 3, 12, 10, 15, 13, 1, 14, 4, 0, 11, 5, 2],
    [0, 15, 11, 8, 12, 9, 6, 3, 13, 1, 2, 4, 10, 7, 5, 14],
    [1, 15, 8, 3, 12, 0, 11, 6, 2, 5, 4, 10, 9, 14, 7, 13],
    [15, 5, 2, 11, 4, 10, 9, 12, 0, 3, 14, 8, 13, 6, 7, 1],
    [7, 2, 12, 5, 8, 4, 6, 11, 14, 9, 1, 15, 13, 3, 10, 0],
    [1, 13, 15, 0, 14, 8, 2, 11, 7, 4, 12, 10, 9, 3, 5, 6],
];

const fn invert(sbox: [u8; 16]) -> [u8; 16] {
    let mut inverse = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        inverse[sbox[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

pub(crate) const SBOX_INV: [[u8; 16]; 8] = [
    invert(SBOX[0]),
    invert(SBOX[1]),
    invert(SBOX[2]),
    invert(SBOX[3]),
    invert(SBOX[4]),
    invert(SBOX[5]),
    invert(SBOX[6]),
    invert(SBOX[7]),
];

/// Applies `table` to the nibble formed by bit `i` of each word (word 0 is the low bit).
pub(crate) fn apply_sbox(table: &[u8; 16], x: &mut Words) {
    let mut out = [0u32; 4];
    for bit in 0..32 {
        let nibble = (x[0] >> bit & 1)
            | (x[1] >> bit & 1) << 1
            | (x[2] >> bit & 1) << 2
            | (x[3] >> bit & 1) << 3;
        let value = table[nibble as usize] as u32;
        for (word, out_word) in out.iter_mut().enumerate() {
            *out_word |= (value >> word & 1) << bit;
        }
    }
    *x = out;
}

fn linear_transform(x: &mut Words) {
    x[0] = x[0].rotate_left(13);
    x[2] = x[2].rotate_left(3);
    x[1] ^= x[0] ^ x[2];
    x[3] ^= x[2] ^ (x[0] << 3);
    x[1] = x[1].rotate_left(1);
    x[3] = x[3].rotate_left(7);
    x[0] ^= x[1] ^ x[3];
    x[2] ^= x[3] ^ (x[1] << 7);
    x[0] = x[0].rotate_left(5);
    x[2] = x[2].rotate_left(22);
}

fn inverse_linear_transform(x: &mut Words) {
    x[2] = x[2].rotate_right(22);
    x[0] = x[0].rotate_right(5);
    x[2] ^= x[3] ^ (x[1] << 7);
    x[0] ^= x[1] ^ x[3];
    x[3] = x[3].rotate_right(7);
    x[1] = x[1].rotate_right(1);
    x[3] ^= x[2] ^ (x[0] << 3);
    x[1] ^= x[0] ^ x[2];
    x[2] = x[2].rotate_right(3);
    x[0] = x[0].rotate_right(13);
}

fn mix_key(x: &mut Words, key: &Words) {
    x.iter_mut().zip(key).for_each(|(w, k)| *w ^= k);
}

fn to_words(bytes: &[u8]) -> Result<Words> {
    let words = words_from_le(bytes)?;
    Ok([words[0], words[1], words[2], words[3]])
}

pub struct Serpent {
    key_expansion: Arc<dyn KeyExpansion + Send + Sync>,
    round_keys: Vec<Words>,
}

impl Serpent {
    pub fn new() -> Self {
        Serpent {
            key_expansion: Arc::new(SerpentKeyExpansion),
            round_keys: Vec::new(),
        }
    }

    pub fn with_key(key: &[u8]) -> Result<Self> {
        let mut serpent = Serpent::new();
        serpent.set_key(key)?;
        Ok(serpent)
    }

    fn load(&self, block: &[u8]) -> Result<Words> {
        if block.len() != SERPENT_BLOCK_SIZE {
            return Err(CryptoError::InvalidBlockLength {
                expected: SERPENT_BLOCK_SIZE,
                actual: block.len(),
            });
        }
        if self.round_keys.len() != SERPENT_ROUNDS + 1 {
            return Err(CryptoError::InconsistentArguments(
                "SERPENT used before a key was set".to_string(),
            ));
        }
        to_words(block)
    }
}

impl Default for Serpent {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherAlgorithm for Serpent {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut x = self.load(block)?;
        for round in 0..SERPENT_ROUNDS {
            mix_key(&mut x, &self.round_keys[round]);
            apply_sbox(&SBOX[round % 8], &mut x);
            if round < SERPENT_ROUNDS - 1 {
                linear_transform(&mut x);
            } else {
                mix_key(&mut x, &self.round_keys[SERPENT_ROUNDS]);
            }
        }
        Ok(words_to_le(&x))
    }

    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut x = self.load(block)?;
        for round in (0..SERPENT_ROUNDS).rev() {
            if round < SERPENT_ROUNDS - 1 {
                inverse_linear_transform(&mut x);
            } else {
                mix_key(&mut x, &self.round_keys[SERPENT_ROUNDS]);
            }
            apply_sbox(&SBOX_INV[round % 8], &mut x);
            mix_key(&mut x, &self.round_keys[round]);
        }
        Ok(words_to_le(&x))
    }
}

impl SymmetricCipher for Serpent {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.round_keys = self
            .key_expansion
            .generate_round_keys(key)?
            .iter()
            .map(|k| to_words(k))
            .collect::<Result<_>>()?;
        Ok(())
    }
}

impl SymmetricCipherWithRounds for Serpent {
    fn block_size(&self) -> usize {
        SERPENT_BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        SERPENT_ROUNDS
    }

    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        Some(self.round_keys.iter().map(|k| words_to_le(k)).collect())
    }
}
