use crate::crypto::errors::Result;

/// Derives the full round-key table from a master key.
pub trait KeyExpansion {
    fn generate_round_keys(&self, key: &[u8]) -> Result<Vec<Vec<u8>>>;
}
