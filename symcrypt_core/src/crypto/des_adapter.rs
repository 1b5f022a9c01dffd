use std::sync::Arc;

use dashmap::DashMap;

use crate::crypto::cipher_traits::CipherAlgorithm;
use crate::crypto::des::DES;
use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::errors::Result;

const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Round function that runs a full DES encryption of the half-block under the round key.
///
/// Keyed DES instances are cached per adapter. When the cache is full it is
/// emptied before the next insert.
pub(crate) struct DesAdapter {
    cache: DashMap<Vec<u8>, Arc<DES>>,
    capacity: usize,
}

impl DesAdapter {
    pub(crate) fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        DesAdapter {
            cache: DashMap::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    fn cipher_for(&self, round_key: &[u8]) -> Result<Arc<DES>> {
        if let Some(cached) = self.cache.get(round_key) {
            return Ok(Arc::clone(cached.value()));
        }

        let des = Arc::new(DES::with_key(round_key)?);
        if self.cache.len() >= self.capacity {
            self.cache.clear();
        }
        self.cache.insert(round_key.to_vec(), Arc::clone(&des));
        Ok(des)
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl EncryptionTransformation for DesAdapter {
    fn transform(&self, input_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>> {
        self.cipher_for(round_key)?.encrypt(input_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_is_emptied_when_full() {
        let adapter = DesAdapter::with_capacity(2);
        let block = [0u8; 8];
        for key in 0u8..3 {
            adapter.transform(&block, &[key; 8]).unwrap();
        }
        assert_eq!(adapter.cached(), 1);
    }

    #[test]
    fn cached_cipher_gives_same_output() {
        let adapter = DesAdapter::new();
        let key = [0x13, 0x34, 0x57, 0x79, 0x9B, 0xBC, 0xDF, 0xF1];
        let block = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
        let first = adapter.transform(&block, &key).unwrap();
        let second = adapter.transform(&block, &key).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![0x85, 0xE8, 0x13, 0x54, 0x0F, 0x0A, 0xB4, 0x05]);
    }
}
