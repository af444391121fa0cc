//! Walk-through of the transaction lifecycle.
//!
//! Builds a payment from a fresh account, signs it, prints the envelope,
//! decodes it back, and re-prices it with a fee bump paid by a sponsor.
//!
//! Run with:
//!   cargo run --example build_and_sign

use meridian_protocol::account::{Account, AccountId, SequenceAccount};
use meridian_protocol::crypto::Keypair;
use meridian_protocol::network::Network;
use meridian_protocol::transaction::{
    AbstractTransaction, Asset, FeeBumpTransactionBuilder, Memo, Operation, Signable,
    TransactionBuilder,
};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn step(n: u32, title: &str) {
    println!("\n{BOLD}[{n}] {title}{RESET}");
}

fn main() -> meridian_protocol::Result<()> {
    let network = Network::testnet();
    let alice = Keypair::generate();
    let sponsor = Keypair::generate();
    let bob = AccountId::from(Keypair::generate().public_key());

    step(1, "Build");
    let mut account = Account::new(alice.public_key(), 4_294_967_296);
    let mut tx = TransactionBuilder::new(&mut account, network.clone())
        .add_operation(Operation::payment(bob, Asset::Native, 25_000_000)?)
        .add_memo(Memo::text("coffee")?)?
        .set_timeout(300)?
        .build()?;
    println!("  sequence     {}", tx.sequence_number());
    println!("  fee          {} stroops", tx.fee());
    println!("  hash         {}", tx.hash_hex()?);
    println!("  {DIM}account now at sequence {}{RESET}", account.sequence_number());

    step(2, "Sign");
    tx.sign(&alice)?;
    let envelope = tx.to_envelope_xdr_base64()?;
    println!("  envelope     {}", envelope);

    step(3, "Decode");
    let decoded = AbstractTransaction::from_envelope_xdr_base64(&envelope, network.clone())?;
    println!("  type         {}", decoded.envelope_type());
    println!("  signatures   {}", decoded.signatures().len());
    println!("  same hash    {}", decoded.hash()? == tx.hash()?);

    step(4, "Fee bump");
    let mut fee_bump = FeeBumpTransactionBuilder::new(tx)
        .set_base_fee(500)?
        .set_fee_account(sponsor.public_key())?
        .build()?;
    fee_bump.sign(&sponsor)?;
    println!("  max fee      {} stroops", fee_bump.fee());
    println!("  hash         {}", fee_bump.hash_hex()?);
    println!("  envelope     {}", fee_bump.to_envelope_xdr_base64()?);

    Ok(())
}
