use crate::crypto::errors::Result;

pub trait CipherAlgorithm {
    fn encrypt(&self, block: &[u8]) -> Result<Vec<u8>>;
    fn decrypt(&self, block: &[u8]) -> Result<Vec<u8>>;
}

pub trait SymmetricCipher: CipherAlgorithm {
    /// Replaces the whole round-key table.
    fn set_key(&mut self, key: &[u8]) -> Result<()>;
}

pub trait SymmetricCipherWithRounds: SymmetricCipher {
    fn block_size(&self) -> usize;
    fn rounds(&self) -> usize;
    fn export_round_keys(&self) -> Option<Vec<Vec<u8>>>;
}
