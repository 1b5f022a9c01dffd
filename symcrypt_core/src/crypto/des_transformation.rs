use crate::crypto::bits::{permute, BitNumbering};
use crate::crypto::byte_ops::{unpack_be, xor};
use crate::crypto::des_tables::{E, P, S_BOXES};
use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::errors::{CryptoError, Result};

/// DES round function `f(R, K) = P(S(E(R) ^ K))` on a 4-byte half.
pub struct DesTransformation;

impl EncryptionTransformation for DesTransformation {
    fn transform(&self, r_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>> {
        if r_block.len() != 4 || round_key.len() != 6 {
            return Err(CryptoError::InconsistentArguments(format!(
                "DES round function takes a 4-byte half and a 6-byte key, got {} and {}",
                r_block.len(),
                round_key.len()
            )));
        }

        // 1. Expansion + key mixing
        let expanded = permute(r_block, &E, BitNumbering::Msb1)?;
        let mixed = unpack_be(&xor(&expanded, round_key)?)? as u64;

        // 2. S-boxes: outer bits pick the row, inner four the column
        let mut substituted = 0u32;
        for (i, s_box) in S_BOXES.iter().enumerate() {
            let chunk = ((mixed >> (42 - 6 * i)) & 0x3F) as usize;
            let row = ((chunk >> 4) & 0b10) | (chunk & 1);
            let column = (chunk >> 1) & 0xF;
            substituted = (substituted << 4) | s_box[row * 16 + column] as u32;
        }

        // 3. P-permutation
        permute(&substituted.to_be_bytes(), &P, BitNumbering::Msb1)
    }
}
