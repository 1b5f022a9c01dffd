use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{error, info};
use symcrypt_core::{
    construct_context, CipherContext, CipherInput, CipherOutput, CryptoError, ExtraParams,
    TransformHandle, TransformOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "symcrypt", version, about = "Block cipher file encryption")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypts INPUT into OUTPUT
    Encrypt(TransformArgs),
    /// Decrypts INPUT into OUTPUT
    Decrypt(TransformArgs),
    /// Lists supported algorithms, modes and paddings
    List,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Encrypt,
    Decrypt,
}

#[derive(clap::Args, Debug)]
struct TransformArgs {
    /// DES, DEAL, MAGENTA or SERPENT
    #[arg(short, long, default_value = "SERPENT")]
    algorithm: String,

    /// ECB, CBC, PCBC, CFB, OFB, CTR or RD
    #[arg(short, long, default_value = "CBC")]
    mode: String,

    /// NONE, ZEROS, ANSI_X923, PKCS7 or ISO_10126
    #[arg(short, long, default_value = "PKCS7")]
    padding: String,

    /// Key as hex
    #[arg(short, long, env = "SYMCRYPT_KEY", hide_env_values = true)]
    key: String,

    /// Initialization vector as hex
    #[arg(long, env = "SYMCRYPT_IV")]
    iv: Option<String>,

    /// Counter increment for RD mode, as hex
    #[arg(long)]
    delta: Option<String>,

    /// Number of parallel stripes, 1 forces a single thread
    #[arg(short, long)]
    threads: Option<usize>,

    input: PathBuf,
    output: PathBuf,
}

fn parse_hex(label: &str, text: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(text.trim())
        .map_err(|e| CryptoError::InconsistentArguments(format!("{label} is not valid hex: {e}")))
}

fn parse_delta(text: &str) -> Result<u128, CryptoError> {
    u128::from_str_radix(text.trim().trim_start_matches("0x"), 16)
        .map_err(|e| CryptoError::InconsistentArguments(format!("delta is not valid hex: {e}")))
}

fn build_context(args: &TransformArgs) -> Result<CipherContext, CryptoError> {
    let key = parse_hex("key", &args.key)?;
    let iv = args.iv.as_deref().map(|iv| parse_hex("iv", iv)).transpose()?;
    let params = ExtraParams {
        random_delta: args.delta.as_deref().map(parse_delta).transpose()?,
    };

    let ctx = construct_context(
        &args.algorithm,
        &key,
        &args.mode,
        &args.padding,
        iv.as_deref(),
        &params,
    )?;

    Ok(match args.threads {
        Some(lanes) => ctx.with_parallelism(lanes),
        None => ctx,
    })
}

async fn drive(mut handle: TransformHandle<CipherOutput>) -> Result<bool, CryptoError> {
    let mut ctrl_c = std::pin::pin!(tokio::signal::ctrl_c());
    let mut interrupted = false;

    loop {
        tokio::select! {
            _ = &mut ctrl_c, if !interrupted => {
                info!("interrupt received, cancelling");
                interrupted = true;
                handle.cancel();
            }
            outcome = handle.wait_timeout(Duration::from_millis(250)) => {
                match outcome? {
                    Some(TransformOutcome::Completed(_)) => {
                        eprintln!("\r100.0%");
                        return Ok(true);
                    }
                    Some(TransformOutcome::Cancelled) => {
                        eprintln!();
                        return Ok(false);
                    }
                    None => {
                        eprint!("\r{:5.1}%", handle.progress() * 100.0);
                        std::io::stderr().flush().ok();
                    }
                }
            }
        }
    }
}

async fn run_transform(direction: Direction, args: TransformArgs) -> Result<bool, CryptoError> {
    let ctx = build_context(&args)?;
    info!(
        "{:?} {} -> {} ({} {} {})",
        direction,
        args.input.display(),
        args.output.display(),
        args.algorithm,
        ctx.mode(),
        ctx.padding()
    );

    let input = CipherInput::File(args.input);
    let output = CipherOutput::File(args.output);
    let handle = match direction {
        Direction::Encrypt => ctx.encrypt_async(input, output),
        Direction::Decrypt => ctx.decrypt_async(input, output),
    };
    drive(handle).await
}

fn list() {
    println!("algorithms:");
    for info in CipherContext::algorithm_info() {
        let keys: Vec<String> = info.key_sizes.iter().map(|k| (k * 8).to_string()).collect();
        println!(
            "  {:<8} block {:>3} bits, keys {} bits",
            info.name,
            info.block_size * 8,
            keys.join("/")
        );
    }
    let modes: Vec<&str> = symcrypt_core::CipherMode::ALL.iter().map(|m| m.name()).collect();
    println!("modes: {}", modes.join(", "));
    let paddings: Vec<&str> = symcrypt_core::PaddingMode::ALL.iter().map(|p| p.name()).collect();
    println!("paddings: {}", paddings.join(", "));
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Encrypt(args) => run_transform(Direction::Encrypt, args).await,
        Command::Decrypt(args) => run_transform(Direction::Decrypt, args).await,
        Command::List => {
            list();
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
