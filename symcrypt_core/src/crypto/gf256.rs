//! Arithmetic in GF(2^8) over an arbitrary degree-8 generator polynomial.
//!
//! Polynomials are written as `u16` bit masks, `0x11B` being
//! `x^8 + x^4 + x^3 + x + 1`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GfError {
    #[error("{0:#05x} is not an irreducible degree-8 polynomial")]
    Reducible(u16),
}

fn degree(poly: u16) -> u32 {
    15 - poly.leading_zeros()
}

/// Remainder of carry-less division of `dividend` by `divisor`.
fn poly_mod(mut dividend: u16, divisor: u16) -> u16 {
    let divisor_degree = degree(divisor);
    while dividend != 0 && degree(dividend) >= divisor_degree {
        dividend ^= divisor << (degree(dividend) - divisor_degree);
    }
    dividend
}

/// Trial division by every polynomial of degree 1 through 4.
pub fn is_irreducible(poly: u16) -> bool {
    if poly >> 8 != 1 {
        return false;
    }
    (2u16..32).all(|candidate| poly_mod(poly, candidate) != 0)
}

pub fn irreducible_polynomials() -> Vec<u16> {
    (0x100u16..0x200).filter(|&p| is_irreducible(p)).collect()
}

fn mul_reduced(a: u8, b: u8, poly: u16) -> u8 {
    let mut a = a as u16;
    let mut b = b;
    let mut acc = 0u16;
    while b != 0 {
        if b & 1 == 1 {
            acc ^= a;
        }
        b >>= 1;
        a <<= 1;
        if a & 0x100 != 0 {
            a ^= poly;
        }
    }
    acc as u8
}

pub fn multiply(a: u8, b: u8, poly: u16) -> Result<u8, GfError> {
    if !is_irreducible(poly) {
        return Err(GfError::Reducible(poly));
    }
    Ok(mul_reduced(a, b, poly))
}

/// A field instance whose polynomial has been checked once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gf256 {
    poly: u16,
}

impl Gf256 {
    pub fn new(poly: u16) -> Result<Self, GfError> {
        if !is_irreducible(poly) {
            return Err(GfError::Reducible(poly));
        }
        Ok(Self { poly })
    }

    pub fn polynomial(&self) -> u16 {
        self.poly
    }

    pub fn mul(&self, a: u8, b: u8) -> u8 {
        mul_reduced(a, b, self.poly)
    }

    pub fn pow(&self, base: u8, mut exp: u32) -> u8 {
        let mut result = 1u8;
        let mut square = base;
        while exp != 0 {
            if exp & 1 == 1 {
                result = self.mul(result, square);
            }
            square = self.mul(square, square);
            exp >>= 1;
        }
        result
    }

    /// `None` for zero.
    pub fn inverse(&self, a: u8) -> Option<u8> {
        (a != 0).then(|| self.pow(a, 254))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly_mod_matches_hand_division() {
        // x^4 + 1 = (x + 1)^4
        assert_eq!(poly_mod(0b1_0001, 0b11), 0);
        assert_eq!(poly_mod(0b1_0011, 0b11), 1);
    }
}
