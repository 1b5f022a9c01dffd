use std::sync::Arc;

use crate::crypto::byte_ops::xor;
use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::key_expansion::KeyExpansion;

/// Structural adjustments applied around the round loop.
///
/// Every hook receives and returns a whole block. The defaults pass the block
/// through untouched.
pub trait FeistelHooks: Send + Sync {
    fn before_encrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        Ok(block)
    }

    fn after_encrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        Ok(block)
    }

    fn before_decrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        Ok(block)
    }

    fn after_decrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        Ok(block)
    }
}

pub struct NoHooks;

impl FeistelHooks for NoHooks {}

/// Swaps the two halves of a block.
pub fn swap_halves(block: &[u8]) -> Vec<u8> {
    let (left, right) = block.split_at(block.len() / 2);
    let mut swapped = Vec::with_capacity(block.len());
    swapped.extend_from_slice(right);
    swapped.extend_from_slice(left);
    swapped
}

/// Balanced Feistel network.
///
/// Encryption round `i` maps `(L, R)` to `(R, L ^ F(R, k_i))`; decryption runs
/// the inverse with the round keys reversed. The number of rounds equals the
/// length of the round-key table produced by the key expansion.
pub struct FeistelNetwork {
    block_size: usize,
    key_expansion: Arc<dyn KeyExpansion + Send + Sync>,
    transformation: Arc<dyn EncryptionTransformation + Send + Sync>,
    hooks: Arc<dyn FeistelHooks>,
    round_keys: Vec<Vec<u8>>,
}

impl FeistelNetwork {
    pub fn new(
        block_size: usize,
        key_expansion: Arc<dyn KeyExpansion + Send + Sync>,
        transformation: Arc<dyn EncryptionTransformation + Send + Sync>,
    ) -> Self {
        FeistelNetwork {
            block_size,
            key_expansion,
            transformation,
            hooks: Arc::new(NoHooks),
            round_keys: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn FeistelHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn rekey(&mut self, key: &[u8]) -> Result<()> {
        self.round_keys = self.key_expansion.generate_round_keys(key)?;
        Ok(())
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn rounds(&self) -> usize {
        self.round_keys.len()
    }

    pub fn round_keys(&self) -> &[Vec<u8>] {
        &self.round_keys
    }

    fn check_block(&self, block: &[u8]) -> Result<()> {
        if self.round_keys.is_empty() {
            return Err(CryptoError::InconsistentArguments(
                "Feistel network used before a key was set".to_string(),
            ));
        }
        if block.len() != self.block_size {
            return Err(CryptoError::InvalidBlockLength {
                expected: self.block_size,
                actual: block.len(),
            });
        }
        Ok(())
    }

    pub fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.check_block(block)?;
        let prepared = self.hooks.before_encrypt(block.to_vec())?;
        let result = self.encrypt_with_round_keys(&prepared, &self.round_keys)?;
        self.hooks.after_encrypt(result)
    }

    pub fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.check_block(block)?;
        let prepared = self.hooks.before_decrypt(block.to_vec())?;
        let result = self.decrypt_with_round_keys(&prepared, &self.round_keys)?;
        self.hooks.after_decrypt(result)
    }

    /// Bare round loop, without hooks.
    pub fn encrypt_with_round_keys(&self, block: &[u8], round_keys: &[Vec<u8>]) -> Result<Vec<u8>> {
        let (left, right) = block.split_at(block.len() / 2);
        let mut left = left.to_vec();
        let mut right = right.to_vec();

        for round_key in round_keys {
            let mixed = self.transformation.transform(&right, round_key)?;
            let next_right = xor(&left, &mixed)?;
            left = std::mem::replace(&mut right, next_right);
        }

        left.extend_from_slice(&right);
        Ok(left)
    }

    pub fn decrypt_with_round_keys(&self, block: &[u8], round_keys: &[Vec<u8>]) -> Result<Vec<u8>> {
        let (left, right) = block.split_at(block.len() / 2);
        let mut left = left.to_vec();
        let mut right = right.to_vec();

        for round_key in round_keys.iter().rev() {
            let mixed = self.transformation.transform(&left, round_key)?;
            let previous_left = xor(&right, &mixed)?;
            right = std::mem::replace(&mut left, previous_left);
        }

        left.extend_from_slice(&right);
        Ok(left)
    }
}
