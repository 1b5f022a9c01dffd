#![allow(dead_code)]

use std::thread;
use std::time::Duration;

use symcrypt_core::{CipherAlgorithm, SymmetricCipher, SymmetricCipherWithRounds};
use symcrypt_core::crypto::errors::Result;

/// Returns every block unchanged, so mode arithmetic can be checked by hand.
pub struct IdentityCipher {
    pub block_size: usize,
}

impl IdentityCipher {
    pub fn new(block_size: usize) -> Self {
        IdentityCipher { block_size }
    }
}

impl CipherAlgorithm for IdentityCipher {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        Ok(block.to_vec())
    }
    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        Ok(block.to_vec())
    }
}

impl SymmetricCipher for IdentityCipher {
    fn set_key(&mut self, _: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl SymmetricCipherWithRounds for IdentityCipher {
    fn block_size(&self) -> usize {
        self.block_size
    }
    fn rounds(&self) -> usize {
        0
    }
    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        None
    }
}

/// Byte-wise XOR with a fixed key, sleeping on every block.
pub struct SlowCipher {
    pub delay: Duration,
}

impl CipherAlgorithm for SlowCipher {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        thread::sleep(self.delay);
        Ok(block.iter().map(|b| b ^ 0x5A).collect())
    }
    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.encrypt(block)
    }
}

impl SymmetricCipher for SlowCipher {
    fn set_key(&mut self, _: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl SymmetricCipherWithRounds for SlowCipher {
    fn block_size(&self) -> usize {
        8
    }
    fn rounds(&self) -> usize {
        1
    }
    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        None
    }
}

/// Panics on first use.
pub struct PanickingCipher;

impl CipherAlgorithm for PanickingCipher {
    fn encrypt(&self, _: &[u8]) -> Result<Vec<u8>> {
        panic!("cipher exploded");
    }
    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.encrypt(block)
    }
}

impl SymmetricCipher for PanickingCipher {
    fn set_key(&mut self, _: &[u8]) -> Result<()> {
        Ok(())
    }
}

impl SymmetricCipherWithRounds for PanickingCipher {
    fn block_size(&self) -> usize {
        8
    }
    fn rounds(&self) -> usize {
        1
    }
    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        None
    }
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut data = vec![0u8; len];
    rand::rng().fill_bytes(&mut data);
    data
}

/// Random bytes whose last byte is non-zero, safe to round-trip through zero padding.
pub fn random_message(len: usize) -> Vec<u8> {
    let mut data = random_bytes(len);
    if let Some(last) = data.last_mut() {
        *last |= 1;
    }
    data
}
