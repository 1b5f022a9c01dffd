use log::warn;
use rand::RngCore;

use crate::crypto::cipher_types::PaddingMode;
use crate::crypto::errors::{CryptoError, Result};

/// Fills and recognises the tail of a final block.
pub trait PaddingScheme: Send + Sync {
    /// Overwrites `block[used..]`. Only called with `used < block.len()`.
    fn fill(&self, block: &mut [u8], used: usize);

    /// Number of trailing bytes to strip, before clamping.
    fn scan(&self, block: &[u8]) -> usize;
}

pub struct NoPadding;
pub struct ZerosPadding;
pub struct AnsiX923Padding;
pub struct Pkcs7Padding;
pub struct Iso10126Padding;

impl PaddingScheme for NoPadding {
    fn fill(&self, _block: &mut [u8], _used: usize) {}

    fn scan(&self, _block: &[u8]) -> usize {
        0
    }
}

impl PaddingScheme for ZerosPadding {
    fn fill(&self, block: &mut [u8], used: usize) {
        block[used..].fill(0);
    }

    fn scan(&self, block: &[u8]) -> usize {
        block.iter().rev().take_while(|&&b| b == 0).count()
    }
}

fn trailing_count(block: &[u8]) -> usize {
    block.last().map_or(0, |&b| b as usize)
}

impl PaddingScheme for AnsiX923Padding {
    fn fill(&self, block: &mut [u8], used: usize) {
        let last = block.len() - 1;
        block[used..last].fill(0);
        block[last] = (block.len() - used) as u8;
    }

    fn scan(&self, block: &[u8]) -> usize {
        trailing_count(block)
    }
}

impl PaddingScheme for Pkcs7Padding {
    fn fill(&self, block: &mut [u8], used: usize) {
        let count = (block.len() - used) as u8;
        block[used..].fill(count);
    }

    fn scan(&self, block: &[u8]) -> usize {
        trailing_count(block)
    }
}

impl PaddingScheme for Iso10126Padding {
    fn fill(&self, block: &mut [u8], used: usize) {
        let last = block.len() - 1;
        rand::rng().fill_bytes(&mut block[used..last]);
        block[last] = (block.len() - used) as u8;
    }

    fn scan(&self, block: &[u8]) -> usize {
        trailing_count(block)
    }
}

impl PaddingMode {
    pub fn scheme(self) -> &'static dyn PaddingScheme {
        match self {
            PaddingMode::None => &NoPadding,
            PaddingMode::Zeros => &ZerosPadding,
            PaddingMode::ANSI_X923 => &AnsiX923Padding,
            PaddingMode::PKCS7 => &Pkcs7Padding,
            PaddingMode::ISO10126 => &Iso10126Padding,
        }
    }

    /// Count-based schemes add a whole block when the message is already aligned.
    pub fn always_pads(self) -> bool {
        matches!(
            self,
            PaddingMode::ANSI_X923 | PaddingMode::PKCS7 | PaddingMode::ISO10126
        )
    }

    /// Number of ciphertext blocks produced for a `len`-byte message.
    pub fn block_count(self, len: u64, block_size: usize) -> Result<u64> {
        let block_size_u64 = block_size as u64;
        let full = len / block_size_u64;
        let remainder = len % block_size_u64;
        match self {
            PaddingMode::None if remainder != 0 => Err(CryptoError::MisalignedInput {
                len,
                block_size,
            }),
            PaddingMode::None => Ok(full),
            PaddingMode::Zeros => Ok(full + u64::from(remainder != 0)),
            _ => Ok(full + 1),
        }
    }

    /// Pads `block` in place after its first `used` bytes. A full block is left alone.
    pub fn set_padding(self, block: &mut [u8], used: usize) {
        if used < block.len() {
            self.scheme().fill(block, used);
        }
    }

    /// Returns `block` with the padding removed.
    ///
    /// A stored count larger than the block is clamped to the whole block and
    /// logged as corruption.
    pub fn clear_padding(self, block: &[u8]) -> &[u8] {
        &block[..block.len() - self.padding_len(block)]
    }

    pub(crate) fn padding_len(self, block: &[u8]) -> usize {
        let count = self.scheme().scan(block);
        if count > block.len() {
            warn!(
                "corrupt {} padding: count {} exceeds the {}-byte block, stripping the whole block",
                self,
                count,
                block.len()
            );
            return block.len();
        }
        count
    }
}
