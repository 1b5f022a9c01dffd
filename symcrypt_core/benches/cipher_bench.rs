use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::RngCore;
use symcrypt_core::{construct_context, Algorithm, CipherAlgorithm, CipherMode, ExtraParams};

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

fn bench_single_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("Single block");

    for algorithm in Algorithm::ALL {
        let info = algorithm.info();
        let cipher = algorithm.instantiate(&random_bytes(info.key_sizes[0])).unwrap();
        let block = random_bytes(info.block_size);

        group.throughput(Throughput::Bytes(info.block_size as u64));
        group.bench_function(BenchmarkId::new("encrypt", info.name), |b| {
            b.iter(|| cipher.encrypt(&block).unwrap())
        });
    }

    group.finish();
}

fn bench_modes(c: &mut Criterion) {
    let data = random_bytes(1024 * 1024);
    let mut group = c.benchmark_group("Modes 1MB SERPENT");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for mode in CipherMode::ALL {
        let ctx = construct_context(
            "SERPENT",
            &random_bytes(32),
            mode.name(),
            "PKCS7",
            Some(random_bytes(16).as_slice()).filter(|_| mode.requires_iv()),
            &ExtraParams::with_random_delta(0x0100_0000_0000_0000_0000_0000_0000_0101),
        )
        .unwrap();

        group.bench_function(BenchmarkId::new("encrypt", mode), |b| {
            b.iter(|| ctx.encrypt_bytes(&data).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_block, bench_modes);
criterion_main!(benches);
