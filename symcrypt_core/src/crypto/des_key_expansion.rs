use bitvec::prelude::*;

use crate::crypto::bits::{permute, BitNumbering};
use crate::crypto::des_tables::{PC1, PC2, SHIFT_BITS};
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;

pub const DES_KEY_SIZE: usize = 8;

/// PC-1, 28-bit C/D rotations, PC-2. Yields sixteen 48-bit keys as 6 bytes each.
pub struct DesKeyExpansion;

impl KeyExpansion for DesKeyExpansion {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        if key.len() != DES_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                algorithm: "DES",
                len: key.len(),
            });
        }

        let permuted = permute(key, &PC1, BitNumbering::Msb1)?;
        let bits = BitVec::<u8, Msb0>::from_slice(&permuted);

        let mut c = bits[..28].to_bitvec();
        let mut d = bits[28..56].to_bitvec();

        let mut round_keys = Vec::with_capacity(SHIFT_BITS.len());
        for &shift in &SHIFT_BITS {
            c.rotate_left(shift);
            d.rotate_left(shift);

            let mut cd = c.clone();
            cd.extend_from_bitslice(&d);

            round_keys.push(permute(&cd.into_vec(), &PC2, BitNumbering::Msb1)?);
        }

        Ok(round_keys)
    }
}
