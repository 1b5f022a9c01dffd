use std::sync::Arc;

use crate::crypto::cipher_traits::{CipherAlgorithm, SymmetricCipher, SymmetricCipherWithRounds};
use crate::crypto::deal_key_expansion::DealKeyExpansion;
use crate::crypto::des_adapter::DesAdapter;
use crate::crypto::errors::Result;
use crate::crypto::feistel_network::FeistelNetwork;

pub const DEAL_BLOCK_SIZE: usize = 16;

/// 128-bit Feistel cipher whose round function is DES.
pub struct DEAL {
    feistel_network: FeistelNetwork,
}

impl DEAL {
    pub fn new() -> Self {
        DEAL {
            feistel_network: FeistelNetwork::new(
                DEAL_BLOCK_SIZE,
                Arc::new(DealKeyExpansion::new()),
                Arc::new(DesAdapter::new()),
            ),
        }
    }

    pub fn with_key(key: &[u8]) -> Result<Self> {
        let mut deal = DEAL::new();
        deal.set_key(key)?;
        Ok(deal)
    }
}

impl Default for DEAL {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherAlgorithm for DEAL {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.feistel_network.encrypt(block)
    }

    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.feistel_network.decrypt(block)
    }
}

impl SymmetricCipher for DEAL {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.feistel_network.rekey(key)
    }
}

impl SymmetricCipherWithRounds for DEAL {
    fn block_size(&self) -> usize {
        DEAL_BLOCK_SIZE
    }

    fn rounds(&self) -> usize {
        self.feistel_network.rounds()
    }

    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>> {
        Some(self.feistel_network.round_keys().to_vec())
    }
}
