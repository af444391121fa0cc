// Envelope benchmarks for the Meridian protocol.
//
// Covers signature-base hashing, Ed25519 signing of a built transaction,
// envelope encoding and envelope decoding at various operation counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use meridian_protocol::account::{Account, AccountId};
use meridian_protocol::crypto::Keypair;
use meridian_protocol::network::Network;
use meridian_protocol::transaction::{
    AbstractTransaction, Asset, Operation, Signable, Transaction, TransactionBuilder,
};

fn signed_transaction(keypair: &Keypair, op_count: usize) -> Transaction {
    let mut account = Account::new(keypair.public_key(), 1);
    let payment =
        Operation::payment(AccountId::from_bytes([0x42; 32]), Asset::Native, 1_000_000).unwrap();
    let mut tx = TransactionBuilder::new(&mut account, Network::testnet())
        .add_operations(std::iter::repeat(payment).take(op_count))
        .build()
        .unwrap();
    tx.sign(keypair).unwrap();
    tx
}

fn bench_hash(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let tx = signed_transaction(&keypair, 1);

    c.bench_function("envelope/hash", |b| {
        b.iter(|| tx.hash().unwrap());
    });
}

fn bench_sign(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let tx = signed_transaction(&keypair, 1);

    c.bench_function("envelope/sign", |b| {
        b.iter(|| {
            let mut tx = tx.clone();
            tx.sign(&keypair).unwrap();
        });
    });
}

fn bench_encode_decode(c: &mut Criterion) {
    let keypair = Keypair::generate();
    let mut group = c.benchmark_group("envelope/codec");

    for op_count in [1usize, 10, 100] {
        let tx = signed_transaction(&keypair, op_count);
        let encoded = tx.to_envelope_xdr_base64().unwrap();
        group.throughput(Throughput::Elements(op_count as u64));

        group.bench_with_input(BenchmarkId::new("encode", op_count), &tx, |b, tx| {
            b.iter(|| tx.to_envelope_xdr_base64().unwrap());
        });
        group.bench_with_input(
            BenchmarkId::new("decode", op_count),
            &encoded,
            |b, encoded| {
                b.iter(|| {
                    AbstractTransaction::from_envelope_xdr_base64(encoded, Network::testnet())
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hash, bench_sign, bench_encode_decode);
criterion_main!(benches);
