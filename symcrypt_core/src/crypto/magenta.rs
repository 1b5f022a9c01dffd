//! MAGENTA: a 128-bit Feistel cipher whose round function is built from the
//! exponentiation S-box `f(x) = 2^x` in GF(2^8) mod `x^8 + x^6 + x^5 + x^2 + 1`.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::crypto::cipher_traits::{CipherAlgorithm, SymmetricCipher, SymmetricCipherWithRounds};
use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::feistel_network::FeistelNetwork;
use crate::crypto::gf256::multiply;
use crate::crypto::magenta_key_expansion::MagentaKeyExpansion;

pub const MAGENTA_BLOCK_SIZE: usize = 16;
pub const MAGENTA_POLYNOMIAL: u16 = 0x165;

/// `f(x) = α^x` for `x < 255`, `f(255) = 0`.
pub static MAGENTA_SBOX: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut sbox = [0u8; 256];
    let mut power = 1u8;
    for entry in sbox.iter_mut().take(255) {
        *entry = power;
        power = multiply(power, 2, MAGENTA_POLYNOMIAL)
            .expect("MAGENTA polynomial is irreducible");
    }
    sbox
});

fn f(x: u8) -> u8 {
    MAGENTA_SBOX[x as usize]
}

fn a(x: u8, y: u8) -> u8 {
    f(x ^ f(y))
}

/// Π: applies `PE` to the byte pairs `(x_i, x_(i+8))`.
fn pi(x: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for i in 0..8 {
        out[2 * i] = a(x[i], x[i + 8]);
        out[2 * i + 1] = a(x[i + 8], x[i]);
    }
    out
}

fn t(x: &[u8; 16]) -> [u8; 16] {
    pi(&pi(&pi(&pi(x))))
}

/// Even-indexed bytes first, then the odd-indexed ones.
fn s(x: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for i in 0..8 {
        out[i] = x[2 * i];
        out[i + 8] = x[2 * i + 1];
    }
    out
}

fn c(rounds: usize, x: &[u8; 16]) -> [u8; 16] {
    let mut state = t(x);
    for _ in 1..rounds {
        let shuffled = s(&state);
        let mut mixed = *x;
        mixed.iter_mut().zip(shuffled).for_each(|(m, v)| *m ^= v);
        state = t(&mixed);
    }
    state
}

/// `F(X2, SK) = first 8 bytes of S(C(3, X2 || SK))`.
pub struct MagentaTransformation;

impl EncryptionTransformation for MagentaTransformation {
    fn transform(&self, input_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>> {
        if input_block.len() != 8 || round_key.len() != 8 {
            return Err(CryptoError::InconsistentArguments(format!(
                "MAGENTA round function takes 8-byte halves, got {} and {}",
                input_block.len(),
                round_key.len()
            )));
        }

        let mut x = [0u8; 16];
        x[..8].copy_from_slice(input_block);
        x[8..].copy_from_slice(round_key);
        Ok(s(&c(3, &x))[..8].to_vec())
    }
}

pub struct Magenta {
    feistel_network: FeistelNetwork,
}

impl Magenta {
    pub fn new() -> Self {
        Magenta {
            feistel_network: FeistelNetwork::new(
                MAGENTA_BLOCK_SIZE,
                Arc::new(MagentaKeyExpansion::new()),
                Arc::new(MagentaTransformation),
            ),
        }
    }

    pub fn with_key(key: &[u8]) -> Result<Self> {
        let mut magenta = Magenta::new();
        magenta.set_key(key)?;
        Ok(magenta)
    }
}

impl Default for Magenta {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherAlgorithm for Magenta {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.feistel_network.encrypt(block)
    }

    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.feistel_network.decrypt(block)
    }
}

impl SymmetricCipher for Magenta {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.feistel_network.rekey(key)
    }
}

impl SymmetricCipherWithRounds for Magenta {
    fn block_size(&self) -> usize {
        MAGENTA_BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        self.feistel_network.rounds()
    }

    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        Some(self.feistel_network.round_keys().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pi_pairs_opposite_halves() {
        let x: [u8; 16] = core::array::from_fn(|i| i as u8);
        let out = pi(&x);
        assert_eq!(out[0], a(0, 8));
        assert_eq!(out[1], a(8, 0));
        assert_eq!(out[15], a(15, 7));
    }

    #[test]
    fn round_function_is_deterministic() {
        let half = [0x11u8; 8];
        let key = [0x22u8; 8];
        let first = MagentaTransformation.transform(&half, &key).unwrap();
        let second = MagentaTransformation.transform(&half, &key).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, [0x8E, 0x14, 0xCD, 0x18, 0x7F, 0x65, 0xF3, 0x17]);
    }
}
