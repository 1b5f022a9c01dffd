//! Bit addressing under the four common numbering conventions.
//!
//! `Msb*` numberings count from the most significant bit of the first byte,
//! `Lsb*` numberings count from the least significant bit of the last byte,
//! so index `0` (or `1`) always addresses the least significant stored bit of
//! the buffer read as a big-endian number. The digit names the origin.

use thiserror::Error;

use crate::crypto::errors::CryptoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitNumbering {
    Lsb0,
    Lsb1,
    Msb0,
    Msb1,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitsError {
    #[error("bit index {index} is out of range for a {bits}-bit buffer under {numbering:?}")]
    OutOfRange {
        index: usize,
        bits: usize,
        numbering: BitNumbering,
    },

    #[error("permutation rule of {0} entries does not fill whole bytes")]
    RuleNotByteAligned(usize),
}

impl BitNumbering {
    pub const ALL: [BitNumbering; 4] = [
        BitNumbering::Lsb0,
        BitNumbering::Lsb1,
        BitNumbering::Msb0,
        BitNumbering::Msb1,
    ];

    /// Index of the first addressable bit.
    pub fn origin(self) -> usize {
        match self {
            BitNumbering::Lsb0 | BitNumbering::Msb0 => 0,
            BitNumbering::Lsb1 | BitNumbering::Msb1 => 1,
        }
    }

    fn lsb_first(self) -> bool {
        matches!(self, BitNumbering::Lsb0 | BitNumbering::Lsb1)
    }

    /// Valid indices for a buffer of `len` bytes.
    pub fn index_range(self, len: usize) -> std::ops::Range<usize> {
        self.origin()..self.origin() + len * 8
    }

    /// Same direction, 1-based. Permutation targets are always addressed this way.
    fn one_based(self) -> BitNumbering {
        if self.lsb_first() {
            BitNumbering::Lsb1
        } else {
            BitNumbering::Msb1
        }
    }

    /// Maps a logical index to `(byte index, in-byte shift)`.
    pub fn locate(self, index: usize, len: usize) -> Result<(usize, u32), BitsError> {
        let bits = len * 8;
        let offset = index
            .checked_sub(self.origin())
            .filter(|&offset| offset < bits)
            .ok_or(BitsError::OutOfRange {
                index,
                bits,
                numbering: self,
            })?;

        let (byte, shift) = if self.lsb_first() {
            (len - 1 - offset / 8, offset % 8)
        } else {
            (offset / 8, 7 - offset % 8)
        };
        Ok((byte, shift as u32))
    }
}

pub fn get_bit(data: &[u8], index: usize, numbering: BitNumbering) -> Result<bool, BitsError> {
    let (byte, shift) = numbering.locate(index, data.len())?;
    Ok((data[byte] >> shift) & 1 == 1)
}

pub fn set_bit(data: &mut [u8], index: usize, numbering: BitNumbering) -> Result<(), BitsError> {
    let (byte, shift) = numbering.locate(index, data.len())?;
    data[byte] |= 1 << shift;
    Ok(())
}

pub fn clear_bit(data: &mut [u8], index: usize, numbering: BitNumbering) -> Result<(), BitsError> {
    let (byte, shift) = numbering.locate(index, data.len())?;
    data[byte] &= !(1 << shift);
    Ok(())
}

pub fn toggle_bit(data: &mut [u8], index: usize, numbering: BitNumbering) -> Result<(), BitsError> {
    let (byte, shift) = numbering.locate(index, data.len())?;
    data[byte] ^= 1 << shift;
    Ok(())
}

pub fn write_bit(
    data: &mut [u8],
    index: usize,
    value: bool,
    numbering: BitNumbering,
) -> Result<(), BitsError> {
    if value {
        set_bit(data, index, numbering)
    } else {
        clear_bit(data, index, numbering)
    }
}

/// Builds a `rule.len() / 8`-byte buffer whose bit `i + 1` is bit `rule[i]` of `data`.
///
/// Source indices follow `numbering`; target indices are 1-based in the same
/// direction, which is how published permutation tables (DES IP, PC-1, ...) are
/// written.
pub fn permute(data: &[u8], rule: &[usize], numbering: BitNumbering) -> Result<Vec<u8>, CryptoError> {
    if rule.len() % 8 != 0 {
        return Err(BitsError::RuleNotByteAligned(rule.len()).into());
    }

    let target = numbering.one_based();
    let mut out = vec![0u8; rule.len() / 8];
    for (i, &source) in rule.iter().enumerate() {
        if get_bit(data, source, numbering)? {
            set_bit(&mut out, i + 1, target)?;
        }
    }
    Ok(out)
}
