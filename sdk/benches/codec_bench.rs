// Codec benchmarks for the Lumen SDK.
//
// Covers encoding and decoding of a realistic programmable transaction,
// type-tag parsing, and decode throughput at various input sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lumen_sdk::transaction::{
    Argument, GasData, ObjectRef, ProgrammableTransactionBuilder, TransactionData,
    TransactionExpiration,
};
use lumen_sdk::types::{Address, Digest, StructTag, TypeTag};

fn sample_tx(transfer_count: u64) -> TransactionData {
    let sender = Address::from_hex("0xaa").unwrap();
    let mut b = ProgrammableTransactionBuilder::new();
    for i in 0..transfer_count {
        let recipient = b.pure(&Address::new([i as u8; 32])).unwrap();
        let amount = b.pure(&(i * 1_000)).unwrap();
        let coin = b.split_coins(Argument::GasCoin, vec![amount]).unwrap();
        b.transfer_objects(vec![coin], recipient).unwrap();
    }
    b.build(
        sender,
        GasData {
            payment: vec![ObjectRef {
                object_id: Address::from_hex("0xcc").unwrap(),
                version: 1,
                digest: Digest::ZERO,
            }],
            owner: sender,
            price: 1_000,
            budget: 50_000_000,
        },
        TransactionExpiration::None,
    )
}

fn bench_encode(c: &mut Criterion) {
    let tx = sample_tx(4);
    c.bench_function("codec/encode_transaction", |b| {
        b.iter(|| tx.to_bytes().unwrap());
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode_transaction");
    for transfer_count in [1u64, 8, 64] {
        let bytes = sample_tx(transfer_count).to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(transfer_count),
            &bytes,
            |b, bytes| {
                b.iter(|| TransactionData::from_bytes(bytes).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let tx = sample_tx(4);
    c.bench_function("codec/transaction_digest", |b| {
        b.iter(|| tx.digest().unwrap());
    });
}

fn bench_type_tag_parse(c: &mut Criterion) {
    let input = "0x2::table::Table<0x2::coin::Coin<0x2::lumen::LUMEN>, vector<u8>>";
    c.bench_function("type_tag/parse", |b| {
        b.iter(|| TypeTag::parse(input).unwrap());
    });
}

fn bench_type_tag_print(c: &mut Criterion) {
    let tag = StructTag::parse("0x2::coin::Coin<0x2::lumen::LUMEN>").unwrap();
    c.bench_function("type_tag/print", |b| {
        b.iter(|| tag.to_string());
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_digest,
    bench_type_tag_parse,
    bench_type_tag_print
);
criterion_main!(benches);
