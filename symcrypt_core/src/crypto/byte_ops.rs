//! Fixed-length byte arithmetic, hex and integer packing helpers.

use crate::crypto::errors::{CryptoError, Result};

fn check_same_len(a: &[u8], b: &[u8]) -> Result<()> {
    if a.len() != b.len() {
        return Err(CryptoError::InconsistentArguments(format!(
            "operands differ in length: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

fn zip_with(a: &[u8], b: &[u8], op: impl Fn(u8, u8) -> u8) -> Result<Vec<u8>> {
    check_same_len(a, b)?;
    Ok(a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect())
}

pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    zip_with(a, b, |x, y| x ^ y)
}

pub fn and(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    zip_with(a, b, |x, y| x & y)
}

pub fn or(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    zip_with(a, b, |x, y| x | y)
}

pub fn xor_in_place(target: &mut [u8], other: &[u8]) -> Result<()> {
    check_same_len(target, other)?;
    target.iter_mut().zip(other).for_each(|(t, &o)| *t ^= o);
    Ok(())
}

pub fn to_hex(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Accepts upper or lower case; whitespace between digits is ignored.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(compact)
        .map_err(|e| CryptoError::InconsistentArguments(format!("invalid hex string: {e}")))
}

fn check_width(value: u128, width: usize) -> Result<()> {
    if width > 16 || (width < 16 && value >> (width * 8) != 0) {
        return Err(CryptoError::InconsistentArguments(format!(
            "{value:#x} does not fit in {width} bytes"
        )));
    }
    Ok(())
}

/// Big-endian encoding of `value` in exactly `width` bytes.
pub fn pack_be(value: u128, width: usize) -> Result<Vec<u8>> {
    check_width(value, width)?;
    Ok(value.to_be_bytes()[16 - width..].to_vec())
}

pub fn pack_le(value: u128, width: usize) -> Result<Vec<u8>> {
    check_width(value, width)?;
    Ok(value.to_le_bytes()[..width].to_vec())
}

pub fn unpack_be(bytes: &[u8]) -> Result<u128> {
    if bytes.len() > 16 {
        return Err(CryptoError::InconsistentArguments(format!(
            "{} bytes do not fit in a 128-bit integer",
            bytes.len()
        )));
    }
    Ok(bytes.iter().fold(0u128, |acc, &b| (acc << 8) | b as u128))
}

pub fn unpack_le(bytes: &[u8]) -> Result<u128> {
    if bytes.len() > 16 {
        return Err(CryptoError::InconsistentArguments(format!(
            "{} bytes do not fit in a 128-bit integer",
            bytes.len()
        )));
    }
    Ok(bytes.iter().rev().fold(0u128, |acc, &b| (acc << 8) | b as u128))
}

pub fn u16_to_be(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn u32_to_be(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn u64_to_be(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

pub fn u64_from_be(bytes: &[u8]) -> Result<u64> {
    let array: [u8; 8] = bytes.try_into().map_err(|_| {
        CryptoError::InconsistentArguments(format!("expected 8 bytes, got {}", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(array))
}

/// Reads `bytes` as consecutive little-endian 32-bit words.
pub fn words_from_le(bytes: &[u8]) -> Result<Vec<u32>> {
    if bytes.len() % 4 != 0 {
        return Err(CryptoError::InconsistentArguments(format!(
            "{} bytes do not split into 32-bit words",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect())
}

pub fn words_to_le(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len()).sum());
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Splits `data` into equal parts of `part_len` bytes.
pub fn split_into(data: &[u8], part_len: usize) -> Result<Vec<Vec<u8>>> {
    if part_len == 0 || data.len() % part_len != 0 {
        return Err(CryptoError::InconsistentArguments(format!(
            "{} bytes cannot be split into {part_len}-byte parts",
            data.len()
        )));
    }
    Ok(data.chunks(part_len).map(<[u8]>::to_vec).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_respects_width() {
        assert_eq!(pack_be(0x0102, 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(pack_le(0x0102, 4).unwrap(), vec![2, 1, 0, 0]);
        assert!(pack_be(0x1_0000, 2).is_err());
        assert_eq!(pack_be(u128::MAX, 16).unwrap(), vec![0xFF; 16]);
    }

    #[test]
    fn unpack_inverts_pack() {
        let bytes = pack_be(0xDEAD_BEEF, 6).unwrap();
        assert_eq!(unpack_be(&bytes).unwrap(), 0xDEAD_BEEF);
        let bytes = pack_le(0xDEAD_BEEF, 6).unwrap();
        assert_eq!(unpack_le(&bytes).unwrap(), 0xDEAD_BEEF);
    }
}
