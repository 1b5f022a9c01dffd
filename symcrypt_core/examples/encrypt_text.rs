use symcrypt_core::{construct_context, Algorithm, CryptoError, ExtraParams};

fn random_bytes(len: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

#[tokio::main]
async fn main() -> Result<(), CryptoError> {
    let text = "The quick brown fox jumps over the lazy dog. Symmetric encryption test string!";
    let data = text.as_bytes();

    for algorithm in Algorithm::ALL {
        let info = algorithm.info();
        let key = random_bytes(*info.key_sizes.last().unwrap_or(&16));
        let iv = random_bytes(info.block_size);

        for mode in ["CBC", "CTR", "RD"] {
            let ctx = construct_context(
                info.name,
                &key,
                mode,
                "PKCS7",
                Some(iv.as_slice()),
                &ExtraParams::with_random_delta(0x0101_0101_0101_0101_0101_0101_0101_0101),
            )?;

            let encrypted = ctx.encrypt_bytes(data)?;
            let decrypted = ctx.decrypt_bytes(&encrypted)?;
            assert_eq!(data, &decrypted[..]);
            println!("{} {}+PKCS7 OK: {}", info.name, mode, hex::encode(&encrypted[..info.block_size]));
        }
    }

    Ok(())
}
