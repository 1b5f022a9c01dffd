use crate::crypto::errors::Result;

/// Keyed round function of a Feistel network: maps one half-block to a new half-block.
pub trait EncryptionTransformation {
    fn transform(&self, input_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>>;
}
