// Hashing & signing benchmarks for the transaction kit.
//
// Covers Ed25519 keypair generation, signing and verifying a transaction
// hash, BLAKE3 hashing of raw data at several sizes, and multi-signature
// verification.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kda_txkit::crypto::{blake3_hash, verify, Blake3Hasher, Hasher};
use kda_txkit::transaction::proto::RawData;
use kda_txkit::{KdaKeypair, Transaction};

fn sample_raw(sender: &KdaKeypair, data_len: usize) -> RawData {
    RawData {
        nonce: 42,
        sender: sender.public_key_bytes().to_vec(),
        data: vec![vec![0xab; data_len]],
        k_app_fee: 500_000,
        bandwidth_fee: 100_000,
        version: 1,
        chain_id: b"108".to_vec(),
        ..Default::default()
    }
}

fn bench_keypair_generation(c: &mut Criterion) {
    c.bench_function("ed25519/keypair_generate", |b| {
        b.iter(KdaKeypair::generate);
    });
}

fn bench_sign_hash(c: &mut Criterion) {
    let keypair = KdaKeypair::generate();
    let hash = blake3_hash(b"raw transaction bytes");

    c.bench_function("ed25519/sign_hash", |b| {
        b.iter(|| keypair.sign(&hash));
    });
}

fn bench_verify_hash(c: &mut Criterion) {
    let keypair = KdaKeypair::generate();
    let hash = blake3_hash(b"raw transaction bytes");
    let signature = keypair.sign(&hash);
    let public_key = keypair.public_key_bytes();

    c.bench_function("ed25519/verify_hash", |b| {
        b.iter(|| verify(&public_key, &hash, &signature));
    });
}

fn bench_hash_raw_data(c: &mut Criterion) {
    let keypair = KdaKeypair::generate();
    let mut group = c.benchmark_group("blake3/raw_data");

    for size in [0usize, 256, 4096, 65536] {
        let raw = sample_raw(&keypair, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &raw, |b, raw| {
            b.iter(|| Transaction::new(raw.clone()).hash_bytes());
        });
    }

    group.finish();
}

fn bench_xof_lengths(c: &mut Criterion) {
    let data = vec![0x5au8; 1024];
    let mut group = c.benchmark_group("blake3/xof");

    for len in [32usize, 64, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| Blake3Hasher.digest(&data, len));
        });
    }

    group.finish();
}

fn bench_verify_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("ed25519/verify_signatures");

    for signers in [1usize, 3, 10] {
        let sender = KdaKeypair::generate();
        let mut tx = Transaction::new(sample_raw(&sender, 64));
        tx.add_signature(sender.sign(&tx.hash_bytes()).to_vec());
        for _ in 1..signers {
            let cosigner = KdaKeypair::generate();
            tx.add_signature(cosigner.sign(&tx.hash_bytes()).to_vec());
        }

        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &tx, |b, tx| {
            b.iter(|| (0..tx.signatures().len()).filter(|&i| tx.verify_signature(i)).count());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_sign_hash,
    bench_verify_hash,
    bench_hash_raw_data,
    bench_xof_lengths,
    bench_verify_signatures,
);
criterion_main!(benches);
