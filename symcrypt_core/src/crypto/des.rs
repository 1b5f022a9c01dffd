use std::sync::Arc;

use crate::crypto::bits::{permute, BitNumbering};
use crate::crypto::cipher_traits::{CipherAlgorithm, SymmetricCipher, SymmetricCipherWithRounds};
use crate::crypto::des_key_expansion::DesKeyExpansion;
use crate::crypto::des_tables::{FP, IP};
use crate::crypto::des_transformation::DesTransformation;
use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::errors::Result;
use crate::crypto::feistel_network::{swap_halves, FeistelHooks, FeistelNetwork};
use crate::crypto::key_expansion::KeyExpansion;

pub const DES_BLOCK_SIZE: usize = 8;

/// Initial and final permutations around the sixteen rounds, plus the final half swap.
struct DesHooks;

impl FeistelHooks for DesHooks {
    fn before_encrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        permute(&block, &IP, BitNumbering::Msb1)
    }

    fn after_encrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        permute(&swap_halves(&block), &FP, BitNumbering::Msb1)
    }

    fn before_decrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        Ok(swap_halves(&permute(&block, &IP, BitNumbering::Msb1)?))
    }

    fn after_decrypt(&self, block: Vec<u8>) -> Result<Vec<u8>> {
        permute(&block, &FP, BitNumbering::Msb1)
    }
}

pub struct DES {
    feistel_network: FeistelNetwork,
}

impl DES {
    pub fn new(
        key_expansion: Arc<dyn KeyExpansion + Send + Sync>,
        transformation: Arc<dyn EncryptionTransformation + Send + Sync>,
    ) -> Self {
        let feistel_network = FeistelNetwork::new(DES_BLOCK_SIZE, key_expansion, transformation)
            .with_hooks(Arc::new(DesHooks));
        DES { feistel_network }
    }

    /// Standard DES keyed with `key`.
    pub fn with_key(key: &[u8]) -> Result<Self> {
        let mut des = DES::new(Arc::new(DesKeyExpansion), Arc::new(DesTransformation));
        des.set_key(key)?;
        Ok(des)
    }
}

impl CipherAlgorithm for DES {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.feistel_network.encrypt(block)
    }

    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.feistel_network.decrypt(block)
    }
}

impl SymmetricCipher for DES {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.feistel_network.rekey(key)
    }
}

impl SymmetricCipherWithRounds for DES {
    fn block_size(&self) -> usize {
        DES_BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        self.feistel_network.rounds()
    }

    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        Some(self.feistel_network.round_keys().to_vec())
    }
}
