use std::env;
use std::path::PathBuf;
use std::time::Duration;

use symcrypt_core::{construct_context, CipherInput, CipherOutput, CryptoError, ExtraParams, TransformOutcome};

#[tokio::main]
async fn main() -> Result<(), CryptoError> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| "Cargo.toml".to_string()));
    let encrypted = input.with_extension("enc");
    let restored = input.with_extension("dec");

    let ctx = construct_context(
        "SERPENT",
        b"0123456789abcdef0123456789abcdef",
        "CFB",
        "ISO 10126",
        Some(&[7u8; 16][..]),
        &ExtraParams::default(),
    )?;

    let mut handle = ctx.encrypt_async(CipherInput::File(input.clone()), CipherOutput::File(encrypted.clone()));
    let outcome = loop {
        match handle.wait_timeout(Duration::from_millis(100)).await? {
            Some(outcome) => break outcome,
            None => println!("encrypting {}: {:.1}%", input.display(), handle.progress() * 100.0),
        }
    };
    if let TransformOutcome::Cancelled = outcome {
        return Ok(());
    }

    ctx.decrypt(CipherInput::File(encrypted.clone()), &mut CipherOutput::File(restored.clone()))
        .await?;
    println!("{} -> {} -> {}", input.display(), encrypted.display(), restored.display());
    Ok(())
}
