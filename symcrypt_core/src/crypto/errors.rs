use thiserror::Error;

use crate::crypto::bits::BitsError;
use crate::crypto::gf256::GfError;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("unknown cipher mode: {0}")]
    UnknownMode(String),

    #[error("unknown padding mode: {0}")]
    UnknownPadding(String),

    #[error("key of {len} bytes is shorter than any {algorithm} key size (minimum {min})")]
    KeyTooShort {
        algorithm: &'static str,
        len: usize,
        min: usize,
    },

    #[error("{algorithm} does not accept a {len}-byte key")]
    InvalidKeyLength { algorithm: &'static str, len: usize },

    #[error("cipher mode {0} requires an initialization vector")]
    MissingIv(&'static str),

    #[error("initialization vector must be {expected} bytes, got {actual}")]
    InvalidIvLength { expected: usize, actual: usize },

    #[error("random delta mode requires a delta parameter")]
    MissingDelta,

    #[error("random delta {0:#x} is unsafe: it must be non-zero with non-zero low and high bytes")]
    UnsafeDelta(u128),

    #[error("input of {len} bytes is not a multiple of the {block_size}-byte block")]
    MisalignedInput { len: u64, block_size: usize },

    #[error("expected a {expected}-byte block, got {actual} bytes")]
    InvalidBlockLength { expected: usize, actual: usize },

    #[error("{blocks} blocks exceed the addressable limit of {limit}")]
    TooManyBlocks { blocks: u64, limit: u64 },

    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("inconsistent arguments: {0}")]
    InconsistentArguments(String),

    #[error("background transform task failed: {0}")]
    Task(String),
}

impl From<BitsError> for CryptoError {
    fn from(err: BitsError) -> Self {
        CryptoError::InconsistentArguments(err.to_string())
    }
}

impl From<GfError> for CryptoError {
    fn from(err: GfError) -> Self {
        CryptoError::InconsistentArguments(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
