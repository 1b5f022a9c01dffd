use std::fmt;
use std::str::FromStr;

use crate::crypto::cipher_traits::SymmetricCipherWithRounds;
use crate::crypto::deal::DEAL;
use crate::crypto::des::DES;
use crate::crypto::errors::{CryptoError, Result};
use crate::crypto::magenta::Magenta;
use crate::crypto::serpent::Serpent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Des,
    Deal,
    Magenta,
    Serpent,
}

/// Static, read-only description of one algorithm.
#[derive(Debug, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub algorithm: Algorithm,
    pub name: &'static str,
    pub block_size: usize,
    /// Ascending.
    pub key_sizes: &'static [usize],
}

pub static ALGORITHMS: [AlgorithmInfo; 4] = [
    AlgorithmInfo {
        algorithm: Algorithm::Des,
        name: "DES",
        block_size: 8,
        key_sizes: &[8],
    },
    AlgorithmInfo {
        algorithm: Algorithm::Deal,
        name: "DEAL",
        block_size: 16,
        key_sizes: &[16, 24, 32],
    },
    AlgorithmInfo {
        algorithm: Algorithm::Magenta,
        name: "MAGENTA",
        block_size: 16,
        key_sizes: &[16, 24, 32],
    },
    AlgorithmInfo {
        algorithm: Algorithm::Serpent,
        name: "SERPENT",
        block_size: 16,
        key_sizes: &[16, 24, 32],
    },
];

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Des,
        Algorithm::Deal,
        Algorithm::Magenta,
        Algorithm::Serpent,
    ];

    pub fn info(self) -> &'static AlgorithmInfo {
        match self {
            Algorithm::Des => &ALGORITHMS[0],
            Algorithm::Deal => &ALGORITHMS[1],
            Algorithm::Magenta => &ALGORITHMS[2],
            Algorithm::Serpent => &ALGORITHMS[3],
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn block_size(self) -> usize {
        self.info().block_size
    }

    /// A keyed cipher instance. `key` must already have a supported length.
    pub fn instantiate(self, key: &[u8]) -> Result<Box<dyn SymmetricCipherWithRounds + Send + Sync>> {
        Ok(match self {
            Algorithm::Des => Box::new(DES::with_key(key)?),
            Algorithm::Deal => Box::new(DEAL::with_key(key)?),
            Algorithm::Magenta => Box::new(Magenta::with_key(key)?),
            Algorithm::Serpent => Box::new(Serpent::with_key(key)?),
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        ALGORITHMS
            .iter()
            .find(|info| info.name == s)
            .map(|info| info.algorithm)
            .ok_or_else(|| CryptoError::UnknownAlgorithm(s.to_string()))
    }
}

/// Fits `key` to a length `algorithm` supports.
///
/// An exact match is returned unchanged. Otherwise the key is truncated to the
/// largest supported length below its own and the top bit of its first byte is
/// set, marking it as adjusted.
pub fn adjust_key(algorithm: Algorithm, key: &[u8]) -> Result<Vec<u8>> {
    let info = algorithm.info();
    if info.key_sizes.contains(&key.len()) {
        return Ok(key.to_vec());
    }

    let target = info
        .key_sizes
        .iter()
        .rev()
        .find(|&&size| size < key.len())
        .ok_or(CryptoError::KeyTooShort {
            algorithm: info.name,
            len: key.len(),
            min: info.key_sizes[0],
        })?;

    let mut adjusted = key[..*target].to_vec();
    adjusted[0] |= 0x80;
    Ok(adjusted)
}
