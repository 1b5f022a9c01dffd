use symcrypt_core::crypto::bits::*;
use symcrypt_core::CryptoError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_for_every_numbering() {
        for numbering in BitNumbering::ALL {
            for index in numbering.index_range(3) {
                let mut buf = [0u8; 3];
                set_bit(&mut buf, index, numbering).unwrap();
                assert!(get_bit(&buf, index, numbering).unwrap(), "{numbering:?} {index}");
                assert_eq!(buf.iter().map(|b| b.count_ones()).sum::<u32>(), 1);

                clear_bit(&mut buf, index, numbering).unwrap();
                assert!(!get_bit(&buf, index, numbering).unwrap());
                assert_eq!(buf, [0u8; 3]);
            }
        }
    }

    #[test]
    fn test_toggle_flips_twice_back() {
        for numbering in BitNumbering::ALL {
            let mut buf = [0xA5u8, 0x3C];
            for index in numbering.index_range(2) {
                let before = get_bit(&buf, index, numbering).unwrap();
                toggle_bit(&mut buf, index, numbering).unwrap();
                assert_ne!(get_bit(&buf, index, numbering).unwrap(), before);
                toggle_bit(&mut buf, index, numbering).unwrap();
            }
            assert_eq!(buf, [0xA5, 0x3C]);
        }
    }

    #[test]
    fn test_out_of_range_indices_fail() {
        let buf = [0u8; 2];
        assert!(get_bit(&buf, 16, BitNumbering::Lsb0).is_err());
        assert!(get_bit(&buf, 16, BitNumbering::Msb0).is_err());
        assert!(get_bit(&buf, 0, BitNumbering::Lsb1).is_err());
        assert!(get_bit(&buf, 0, BitNumbering::Msb1).is_err());
        assert!(get_bit(&buf, 17, BitNumbering::Msb1).is_err());
        assert!(get_bit(&buf, 16, BitNumbering::Lsb1).is_ok());
    }

    #[test]
    fn test_index_zero_addresses_least_significant_stored_bit() {
        let mut buf = [0u8; 2];
        set_bit(&mut buf, 0, BitNumbering::Lsb0).unwrap();
        assert_eq!(buf, [0x00, 0x01]);

        let mut buf = [0u8; 2];
        set_bit(&mut buf, 0, BitNumbering::Msb0).unwrap();
        assert_eq!(buf, [0x80, 0x00]);

        let mut buf = [0u8; 2];
        set_bit(&mut buf, 9, BitNumbering::Lsb1).unwrap();
        assert_eq!(buf, [0x01, 0x00]);
    }

    #[test]
    fn test_permute_swaps_nibbles() {
        let rule = [5, 6, 7, 8, 1, 2, 3, 4];
        assert_eq!(permute(&[0xA5], &rule, BitNumbering::Msb1).unwrap(), vec![0x5A]);
    }

    #[test]
    fn test_permute_can_shrink_and_repeat() {
        // first bit of the input, eight times
        let rule = [1; 8];
        assert_eq!(permute(&[0x80, 0x00], &rule, BitNumbering::Msb1).unwrap(), vec![0xFF]);
        assert_eq!(permute(&[0x7F, 0xFF], &rule, BitNumbering::Msb1).unwrap(), vec![0x00]);
    }

    #[test]
    fn test_permute_lsb_numbering_reverses_direction() {
        let rule: Vec<usize> = (1..=16).collect();
        let data = [0x12, 0x34];
        assert_eq!(permute(&data, &rule, BitNumbering::Lsb1).unwrap(), data.to_vec());
        assert_eq!(permute(&data, &rule, BitNumbering::Msb1).unwrap(), data.to_vec());
    }

    #[test]
    fn test_permute_errors_become_inconsistent_arguments() {
        let err = permute(&[0xFF], &[1, 2, 3], BitNumbering::Msb1).unwrap_err();
        assert!(matches!(err, CryptoError::InconsistentArguments(_)));

        let err = permute(&[0xFF], &[9; 8], BitNumbering::Msb1).unwrap_err();
        assert!(matches!(err, CryptoError::InconsistentArguments(_)));
    }
}
