mod common;

use std::time::Duration;

use common::{random_message, PanickingCipher, SlowCipher};
use symcrypt_core::{
    construct_context, CipherContext, CipherInput, CipherMode, CipherOutput, CryptoError,
    ExtraParams, PaddingMode, TransformOutcome, TransformState,
};
use tempfile::tempdir;

fn slow_context(mode: CipherMode) -> CipherContext {
    CipherContext::new(
        Box::new(SlowCipher {
            delay: Duration::from_micros(500),
        }),
        mode,
        PaddingMode::PKCS7,
        Some(vec![0; 8]),
        ExtraParams::default(),
    )
    .unwrap()
    .with_parallelism(1)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_roundtrip_reports_progress() {
    let ctx = construct_context(
        "MAGENTA",
        &[0x11; 24],
        "CFB",
        "ANSI X923",
        Some(&[0x22; 16][..]),
        &ExtraParams::default(),
    )
    .unwrap();
    let message = random_message(1000);

    let handle = ctx.encrypt_async(CipherInput::Bytes(message.clone()), CipherOutput::buffer());
    let encrypted = match handle.wait().await.unwrap() {
        TransformOutcome::Completed(out) => out.into_bytes().unwrap(),
        TransformOutcome::Cancelled => panic!("nobody cancelled"),
    };

    let handle = ctx.decrypt_async(CipherInput::Bytes(encrypted), CipherOutput::buffer());
    let mut handle = handle;
    let outcome = handle
        .wait_timeout(Duration::from_secs(30))
        .await
        .unwrap()
        .expect("finished in time");
    assert_eq!(handle.state(), TransformState::Completed);
    assert!(handle.is_done());
    assert_eq!(handle.total_blocks(), 63);
    assert_eq!(handle.completed_blocks(), 63);
    assert_eq!(handle.progress(), 1.0);
    assert_eq!(outcome.completed().unwrap().into_bytes().unwrap(), message);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_stops_sequential_transform() {
    let ctx = slow_context(CipherMode::CBC);
    let handle = ctx.encrypt_async(CipherInput::Bytes(vec![1; 8 * 20_000]), CipherOutput::buffer());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_done());
    assert!(handle.progress() < 1.0);
    handle.cancel();

    let mut handle = handle;
    let outcome = handle.wait_timeout(Duration::from_secs(10)).await.unwrap().unwrap();
    assert!(outcome.is_cancelled());
    assert!(handle.is_cancelled());
    assert!(!handle.is_failed());
    assert!(handle.completed_blocks() < handle.total_blocks());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_stops_parallel_transform() {
    let ctx = slow_context(CipherMode::CTR).with_parallelism(4);
    let handle = ctx.encrypt_async(CipherInput::Bytes(vec![1; 8 * 40_000]), CipherOutput::buffer());

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();
    assert!(handle.wait().await.unwrap().is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_timeout_returns_none_while_running() {
    let ctx = slow_context(CipherMode::OFB);
    let mut handle = ctx.encrypt_async(CipherInput::Bytes(vec![1; 8 * 20_000]), CipherOutput::buffer());

    assert!(handle.wait_timeout(Duration::from_millis(5)).await.unwrap().is_none());
    assert_eq!(handle.state(), TransformState::Running);

    handle.cancel();
    assert!(handle.wait().await.unwrap().is_cancelled());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_is_terminal_state() {
    let dir = tempdir().unwrap();
    let ctx = construct_context("DES", &[1; 8], "ECB", "NONE", None, &ExtraParams::default()).unwrap();

    let mut handle = ctx.encrypt_async(
        CipherInput::File(dir.path().join("missing")),
        CipherOutput::buffer(),
    );
    assert!(handle.wait_timeout(Duration::from_secs(10)).await.is_err());
    assert!(handle.is_failed());
    assert!(handle.wait_timeout(Duration::from_millis(1)).await.is_err());
}

#[tokio::test]
async fn test_awaitable_encrypt_fills_output() {
    let ctx = construct_context(
        "DEAL",
        &[0x5A; 32],
        "PCBC",
        "PKCS7",
        Some(&[0x01; 16][..]),
        &ExtraParams::default(),
    )
    .unwrap();

    let mut encrypted = CipherOutput::buffer();
    ctx.encrypt(CipherInput::Bytes(b"Hello, world!\n".to_vec()), &mut encrypted)
        .await
        .unwrap();

    let mut decrypted = CipherOutput::buffer();
    ctx.decrypt(CipherInput::Bytes(encrypted.into_bytes().unwrap()), &mut decrypted)
        .await
        .unwrap();
    assert_eq!(decrypted.into_bytes().unwrap(), b"Hello, world!\n");
}

#[test]
fn test_wait_blocking_outside_async_code() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let ctx = construct_context("SERPENT", &[3; 32], "ECB", "ZEROS", None, &ExtraParams::default())
        .unwrap();

    let handle = {
        let _guard = runtime.enter();
        ctx.encrypt_async(CipherInput::Bytes(vec![9; 100]), CipherOutput::buffer())
    };
    let outcome = handle.wait_blocking().unwrap();
    assert_eq!(outcome.completed().unwrap().into_bytes().unwrap().len(), 112);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_transform_is_marked_failed() {
    let ctx = CipherContext::new(
        Box::new(PanickingCipher),
        CipherMode::ECB,
        PaddingMode::PKCS7,
        None,
        ExtraParams::default(),
    )
    .unwrap();

    let handle = ctx.encrypt_async(CipherInput::Bytes(vec![7; 40]), CipherOutput::buffer());
    while !handle.is_done() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(handle.is_failed());
    assert_eq!(handle.state(), TransformState::Failed);

    let result = handle.wait().await;
    assert!(matches!(result, Err(CryptoError::Task(message)) if message.contains("cipher exploded")));
}
