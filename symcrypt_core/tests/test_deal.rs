use hex_literal::hex;
use symcrypt_core::crypto::deal::DEAL;
use symcrypt_core::crypto::des::DES;
use symcrypt_core::crypto::deal_key_expansion::{deal_rounds, DealKeyExpansion};
use symcrypt_core::crypto::key_expansion::KeyExpansion;
use symcrypt_core::{CipherAlgorithm, CryptoError, SymmetricCipher, SymmetricCipherWithRounds};

const KEY_256: [u8; 32] = hex!(
    "13 34 57 79 9B BC DF F1 01 23 45 67 89 AB CD EF
     FE DC BA 98 76 54 32 10 0F 1E 2D 3C 4B 5A 69 78"
);

#[test]
fn test_deal_encrypt_decrypt() {
    let plaintext = hex!("01 23 45 67 89 AB CD EF FE DC BA 98 76 54 32 10");

    for key_len in [16, 24, 32] {
        let mut deal = DEAL::new();
        deal.set_key(&KEY_256[..key_len]).unwrap();

        let ciphertext = deal.encrypt(&plaintext).unwrap();
        assert_ne!(ciphertext, plaintext);
        assert_eq!(deal.decrypt(&ciphertext).unwrap(), plaintext);
        assert_eq!(deal.rounds(), deal_rounds(key_len).unwrap());
    }
}

#[test]
fn test_deal_round_counts() {
    assert_eq!(deal_rounds(16), Some(6));
    assert_eq!(deal_rounds(24), Some(6));
    assert_eq!(deal_rounds(32), Some(8));
    assert_eq!(deal_rounds(8), None);
}

#[test]
fn test_deal_round_keys_have_parity_bits_cleared() {
    let round_keys = DealKeyExpansion::new().generate_round_keys(&KEY_256).unwrap();
    assert_eq!(round_keys.len(), 8);
    for round_key in &round_keys {
        assert_eq!(round_key.len(), 8);
        assert!(round_key.iter().all(|b| b & 1 == 0));
    }
}

#[test]
fn test_deal_schedule_depends_on_every_part() {
    let expansion = DealKeyExpansion::new();
    let base = expansion.generate_round_keys(&KEY_256[..24]).unwrap();

    let mut changed = KEY_256[..24].to_vec();
    changed[20] ^= 0x10;
    let other = expansion.generate_round_keys(&changed).unwrap();

    assert_eq!(base[..2], other[..2]);
    assert_ne!(base[2], other[2]);
}

#[test]
fn test_deal_rejects_bad_keys_and_blocks() {
    let mut deal = DEAL::new();
    assert!(matches!(
        deal.set_key(&[0u8; 20]),
        Err(CryptoError::InvalidKeyLength { algorithm: "DEAL", len: 20 })
    ));

    let deal = DEAL::with_key(&KEY_256[..16]).unwrap();
    assert_eq!(deal.block_size(), 16);
    assert!(deal.encrypt(&[0u8; 8]).is_err());
}

#[test]
fn test_deal_different_keys_differ() {
    let block = [0u8; 16];
    let first = DEAL::with_key(&KEY_256[..16]).unwrap().encrypt(&block).unwrap();
    let second = DEAL::with_key(&KEY_256[16..]).unwrap().encrypt(&block).unwrap();
    assert_ne!(first, second);
}

fn xor8(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

fn clear_parity(block: &[u8]) -> Vec<u8> {
    block.iter().map(|b| b & 0xFE).collect()
}

#[test]
fn test_deal_schedule_matches_des_chain() {
    let des = DES::with_key(&hex!("01 23 45 67 89 AB CD EF")).unwrap();
    let (k1, k2) = (&KEY_256[..8], &KEY_256[8..16]);

    let raw0 = des.encrypt(k1).unwrap();
    let raw1 = des.encrypt(&xor8(k2, &raw0)).unwrap();
    let constant = hex!("00 00 00 00 00 00 00 01");
    let raw2 = des.encrypt(&xor8(&xor8(k1, &raw1), &constant)).unwrap();

    let round_keys = DealKeyExpansion::new().generate_round_keys(&KEY_256[..16]).unwrap();
    assert_eq!(round_keys[0], clear_parity(&raw0));
    assert_eq!(round_keys[1], clear_parity(&raw1));
    assert_eq!(round_keys[2], clear_parity(&raw2));
}

#[test]
fn test_deal_128_round_keys() {
    let round_keys = DealKeyExpansion::new().generate_round_keys(&KEY_256[..16]).unwrap();
    let expected = [
        hex!("90 1C A0 9E 8A C6 02 B0"),
        hex!("F6 CE B4 92 BA DE BC 9C"),
        hex!("1E CC 58 C0 38 06 1A 0C"),
        hex!("B2 B4 66 BA CE 52 C4 A0"),
        hex!("70 2C A0 9C 6A 36 D8 A8"),
        hex!("6A 02 4E 5C 82 E0 4A 0C"),
    ];
    assert_eq!(round_keys.len(), expected.len());
    for (round_key, expected) in round_keys.iter().zip(expected) {
        assert_eq!(round_key[..], expected);
    }
}

#[test]
fn test_deal_known_answer() {
    let plaintext = hex!("01 23 45 67 89 AB CD EF FE DC BA 98 76 54 32 10");
    let vectors = [
        (16, hex!("5A B8 7C E1 C7 38 C9 C0 B4 E9 A3 F3 A2 75 C0 10")),
        (24, hex!("87 1D 21 ED 41 80 B4 0A CE 93 13 A6 AB 9C C5 C4")),
        (32, hex!("D8 77 13 0C CC 18 70 7D B1 96 A4 43 93 8F F5 32")),
    ];

    for (key_len, expected) in vectors {
        let deal = DEAL::with_key(&KEY_256[..key_len]).unwrap();
        let ciphertext = deal.encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext, expected, "{key_len}-byte key");
        assert_eq!(deal.decrypt(&ciphertext).unwrap(), plaintext);
    }
}
