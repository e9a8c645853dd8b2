// Encoding benchmarks for the transaction kit.
//
// Measures offline assembly through the builder, binary and hex encoding,
// and decoding of both the wire format and loose JSON records, for
// transactions carrying one to many operations.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kda_txkit::{
    AddressCodec, Bech32AddressCodec, BuildOverrides, KdaKeypair, NetworkConfig, Transaction,
    TransactionBuilder, TransferParams,
};

fn builder_with(operations: usize) -> TransactionBuilder {
    let codec = Bech32AddressCodec::mainnet();
    let sender = KdaKeypair::from_seed(&[1u8; 32]);
    let receiver = codec.encode(&[2u8; 32]).unwrap();

    let mut builder = TransactionBuilder::for_network(NetworkConfig::mainnet()).unwrap();
    builder
        .set_sender(&sender.address(&codec).unwrap())
        .unwrap()
        .set_nonce(42)
        .unwrap();
    for i in 0..operations {
        builder
            .add_transfer(TransferParams {
                receiver: receiver.clone(),
                amount: (1_000 + i as u64).into(),
                ..Default::default()
            })
            .unwrap();
    }
    builder
}

fn bench_build_proto(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding/build_proto");

    for ops in [1usize, 10, 100] {
        let builder = builder_with(ops);
        group.throughput(Throughput::Elements(ops as u64));
        group.bench_with_input(BenchmarkId::from_parameter(ops), &builder, |b, builder| {
            b.iter(|| builder.build_proto(BuildOverrides::default()).unwrap());
        });
    }

    group.finish();
}

fn bench_to_hex(c: &mut Criterion) {
    let tx = builder_with(10).build_proto(BuildOverrides::default()).unwrap();

    c.bench_function("encoding/to_hex", |b| {
        b.iter(|| tx.to_hex());
    });
}

fn bench_from_bytes(c: &mut Criterion) {
    let bytes = builder_with(10)
        .build_proto(BuildOverrides::default())
        .unwrap()
        .to_bytes();

    c.bench_function("encoding/from_bytes", |b| {
        b.iter(|| Transaction::from_bytes(&bytes).unwrap());
    });
}

fn bench_loose_records(c: &mut Criterion) {
    let tx = builder_with(10).build_proto(BuildOverrides::default()).unwrap();
    let object = tx.to_object();

    c.bench_function("encoding/to_object", |b| {
        b.iter(|| tx.to_object());
    });
    c.bench_function("encoding/from_object", |b| {
        b.iter(|| Transaction::from_object(&object).unwrap());
    });
}

fn bench_build_request(c: &mut Criterion) {
    let builder = builder_with(10);

    c.bench_function("encoding/build_request", |b| {
        b.iter(|| builder.build_request().unwrap());
    });
}

criterion_group!(
    benches,
    bench_build_proto,
    bench_to_hex,
    bench_from_bytes,
    bench_loose_records,
    bench_build_request,
);
criterion_main!(benches);
