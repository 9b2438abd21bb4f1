//! End-to-end demo of the transaction codec.
//!
//! Builds a coin transfer as a programmable transaction, seals the
//! envelope, encodes it to canonical bytes, decodes it back, and prints
//! the digest a signer would commit to.
//!
//! Run with:
//!   cargo run --example demo

use lumen_sdk::transaction::{
    GasData, ObjectRef, ProgrammableTransactionBuilder, TransactionData, TransactionExpiration,
};
use lumen_sdk::types::{Address, Digest};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let sender = Address::from_hex("0xa11ce")?;
    let recipient = Address::from_hex("0xb0b")?;

    // Split 1000 base units off the gas coin, send them to the recipient.
    let mut builder = ProgrammableTransactionBuilder::new();
    let amount = builder.pure(&1_000u64)?;
    let to = builder.pure(&recipient)?;
    let coin = builder.split_coins(builder.gas(), vec![amount])?;
    builder.transfer_objects(vec![coin], to)?;

    let tx = builder.build(
        sender,
        GasData {
            payment: vec![ObjectRef {
                object_id: Address::from_hex("0xc01")?,
                version: 42,
                digest: Digest::ZERO,
            }],
            owner: sender,
            price: 1_000,
            budget: 5_000_000,
        },
        TransactionExpiration::None,
    );
    tx.validate_for_execution()?;

    let bytes = tx.to_bytes()?;
    info!(size = bytes.len(), "transaction encoded");
    println!("wire bytes: {}", hex::encode(&bytes));

    let decoded = TransactionData::from_bytes(&bytes)?;
    assert_eq!(decoded, tx, "round-trip must be lossless");
    info!("round-trip verified");

    println!("digest:     {}", tx.digest()?);
    Ok(())
}
