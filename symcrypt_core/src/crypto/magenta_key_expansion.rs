use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;
use crate::crypto::key_extraction::KeyExtraction;

/// Order in which the 8-byte key parts feed the rounds.
pub fn magenta_key_order(parts: usize) -> Option<&'static [usize]> {
    match parts {
        2 => Some(&[0, 0, 1, 1, 0, 0]),
        3 => Some(&[0, 1, 2, 2, 1, 0]),
        4 => Some(&[0, 1, 2, 3, 3, 2, 1, 0]),
        _ => None,
    }
}

pub struct MagentaKeyExpansion {
    extraction: KeyExtraction,
}

impl MagentaKeyExpansion {
    pub fn new() -> Self {
        MagentaKeyExpansion {
            extraction: KeyExtraction::new(8, 4),
        }
    }
}

impl Default for MagentaKeyExpansion {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyExpansion for MagentaKeyExpansion {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        let invalid = || CryptoError::InvalidKeyLength {
            algorithm: "MAGENTA",
            len: key.len(),
        };
        if !matches!(key.len(), 16 | 24 | 32) {
            return Err(invalid());
        }

        let parts = self.extraction.extract(key)?;
        let order = magenta_key_order(parts.len()).ok_or_else(invalid)?;
        Ok(order.iter().map(|&i| parts[i].clone()).collect())
    }
}
