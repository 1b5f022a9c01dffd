use crate::crypto::bits::{permute, BitNumbering};
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;

/// Splits a key into equal-width parts with no mixing.
///
/// Each part is selected through a bit permutation so the same addressing
/// code serves every fixed table in the crate.
#[derive(Debug, Clone, Copy)]
pub struct KeyExtraction {
    part_size: usize,
    max_parts: usize,
}

impl KeyExtraction {
    pub fn new(part_size: usize, max_parts: usize) -> Self {
        KeyExtraction {
            part_size,
            max_parts,
        }
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    pub fn extract(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        let parts = key.len() / self.part_size;
        if key.len() % self.part_size != 0 || parts == 0 || parts > self.max_parts {
            return Err(CryptoError::InconsistentArguments(format!(
                "cannot extract {}-byte parts (at most {}) from a {}-byte key",
                self.part_size,
                self.max_parts,
                key.len()
            )));
        }

        let part_bits = self.part_size * 8;
        (0..parts)
            .map(|part| {
                let rule: Vec<usize> = (part * part_bits + 1..=(part + 1) * part_bits).collect();
                permute(key, &rule, BitNumbering::Msb1)
            })
            .collect()
    }
}

impl KeyExpansion for KeyExtraction {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.extract(key)
    }
}
