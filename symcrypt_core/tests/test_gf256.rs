use symcrypt_core::crypto::gf256::*;

#[test]
fn test_there_are_thirty_irreducible_polynomials() {
    let polys = irreducible_polynomials();
    assert_eq!(polys.len(), 30);
    assert!(polys.contains(&0x11B));
    assert!(polys.contains(&0x165));
    assert!(polys.iter().all(|&p| p & 1 == 1));
}

#[test]
fn test_reducible_polynomials_are_rejected() {
    // x^8 + 1 = (x + 1)^8
    assert!(!is_irreducible(0x101));
    assert!(!is_irreducible(0x100));
    assert!(!is_irreducible(0x1B));
    assert_eq!(multiply(3, 7, 0x101), Err(GfError::Reducible(0x101)));
    assert!(Gf256::new(0x101).is_err());
}

#[test]
fn test_multiply_matches_aes_field() {
    assert_eq!(multiply(0x57, 0x83, 0x11B), Ok(0xC1));
    assert_eq!(multiply(0x57, 0x13, 0x11B), Ok(0xFE));
    assert_eq!(multiply(0x00, 0x83, 0x11B), Ok(0x00));
    assert_eq!(multiply(0x01, 0x83, 0x11B), Ok(0x83));
}

#[test]
fn test_field_inverse() {
    let field = Gf256::new(0x11B).unwrap();
    assert_eq!(field.inverse(0x53), Some(0xCA));
    assert_eq!(field.inverse(0), None);
    for a in 1..=255u8 {
        let inv = field.inverse(a).unwrap();
        assert_eq!(field.mul(a, inv), 1);
    }
}

#[test]
fn test_powers_of_two_cycle_in_magenta_field() {
    let field = Gf256::new(0x165).unwrap();
    assert_eq!(field.pow(2, 8), 0x65);
    assert_eq!(field.pow(2, 255), 1);
    let distinct: std::collections::HashSet<u8> = (0..255).map(|e| field.pow(2, e)).collect();
    assert_eq!(distinct.len(), 255);
}
