pub mod algorithms;
pub mod bits;
pub mod byte_ops;
pub mod cipher_context;
pub mod cipher_traits;
pub mod cipher_types;
pub mod deal;
pub mod deal_key_expansion;
pub mod des;
pub mod des_key_expansion;
pub mod des_tables;
pub mod des_transformation;
pub mod encryption_transformation;
pub mod errors;
pub mod feistel_network;
pub mod gf256;
pub mod key_expansion;
pub mod key_extraction;
pub mod magenta;
pub mod magenta_key_expansion;
pub mod padding;
pub mod progress;
pub mod serpent;
pub mod serpent_key_expansion;
mod cipher_io;
mod des_adapter;
mod mode_engine;

use std::sync::Arc;

use crate::crypto::encryption_transformation::EncryptionTransformation;
use crate::crypto::errors::Result;
use crate::crypto::key_expansion::KeyExpansion;

impl KeyExpansion for Arc<dyn KeyExpansion + Send + Sync> {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>> {
        (**self).generate_round_keys(key)
    }
}

impl EncryptionTransformation for Arc<dyn EncryptionTransformation + Send + Sync> {
    fn transform(&self, input_block: &[u8], round_key: &[u8]) -> Result<Vec<u8>> {
        (**self).transform(input_block, round_key)
    }
}
