// Copyright (c) 2026 Meridian Contributors. MIT License.
// See LICENSE for details.

//! # Meridian Envelope Tool
//!
//! Entry point for the `meridian-tool` binary. Parses CLI arguments,
//! initializes logging, and runs one offline operation on a base64
//! transaction envelope:
//!
//! - `decode`   — print the typed transaction as JSON
//! - `hash`     — print the transaction hash for the configured network
//! - `sign`     — append a signature and print the envelope
//! - `fee-bump` — wrap a transaction in a signed fee-bump envelope
//! - `version`  — print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;

use meridian_protocol::crypto::Keypair;
use meridian_protocol::network::Network;
use meridian_protocol::transaction::{AbstractTransaction, FeeBumpTransactionBuilder, Signable};

use cli::{Commands, EnvelopeArg, FeeBumpArgs, MeridianCli, SignArgs};

fn main() -> Result<()> {
    let cli = MeridianCli::parse();
    logging::init_logging("meridian_tool=info,meridian_protocol=warn", cli.log_format);

    let network = Network::new(cli.network_passphrase);
    tracing::debug!(network = %network, "network selected");

    match cli.command {
        Commands::Decode(args) => decode(&args, network),
        Commands::Hash(args) => hash(&args, network),
        Commands::Sign(args) => sign(&args, network),
        Commands::FeeBump(args) => fee_bump(&args, network),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Reads the envelope argument, following `-` to stdin.
fn read_envelope(arg: &EnvelopeArg) -> Result<String> {
    if arg.envelope == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read envelope from stdin")?;
        Ok(buf)
    } else {
        Ok(arg.envelope.clone())
    }
}

fn load(arg: &EnvelopeArg, network: Network) -> Result<AbstractTransaction> {
    let encoded = read_envelope(arg)?;
    AbstractTransaction::from_envelope_xdr_base64(&encoded, network)
        .context("failed to decode transaction envelope")
}

fn decode(args: &EnvelopeArg, network: Network) -> Result<()> {
    let tx = load(args, network)?;
    let hash = tx.hash_hex().context("failed to hash transaction")?;
    let transaction = serde_json::to_value(&tx).context("failed to serialize transaction")?;
    let mut output = serde_json::Map::new();
    output.insert("hash".into(), hash.into());
    output.insert(
        "envelope_type".into(),
        tx.envelope_type().to_string().into(),
    );
    output.insert("transaction".into(), transaction);
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to render JSON")?
    );
    Ok(())
}

fn hash(args: &EnvelopeArg, network: Network) -> Result<()> {
    let tx = load(args, network)?;
    println!("{}", tx.hash_hex().context("failed to hash transaction")?);
    Ok(())
}

fn sign(args: &SignArgs, network: Network) -> Result<()> {
    let keypair = Keypair::from_secret_hex(&args.secret_key).context("invalid secret key")?;
    let mut tx = load(&args.input, network)?;

    tx.sign(&keypair).context("failed to sign transaction")?;
    tracing::info!(
        signer = %keypair.public_key(),
        signatures = tx.signatures().len(),
        "signature added"
    );

    println!(
        "{}",
        tx.to_envelope_xdr_base64()
            .context("failed to encode envelope")?
    );
    Ok(())
}

fn fee_bump(args: &FeeBumpArgs, network: Network) -> Result<()> {
    let keypair = Keypair::from_secret_hex(&args.secret_key).context("invalid secret key")?;
    let inner = match load(&args.input, network)? {
        AbstractTransaction::Transaction(tx) => tx,
        AbstractTransaction::FeeBump(_) => {
            anyhow::bail!("envelope is already a fee-bump transaction")
        }
    };

    let mut fee_bump = FeeBumpTransactionBuilder::new(inner)
        .set_base_fee(args.base_fee)
        .and_then(|b| b.set_fee_account(keypair.public_key()))
        .and_then(|b| b.build())
        .context("failed to build fee-bump transaction")?;
    fee_bump
        .sign(&keypair)
        .context("failed to sign fee-bump transaction")?;

    let hash = fee_bump.hash_hex().context("failed to hash fee-bump transaction")?;
    tracing::info!(
        fee = fee_bump.fee(),
        fee_account = %fee_bump.fee_account(),
        hash = %hash,
        "fee-bump transaction built"
    );

    println!(
        "{}",
        fee_bump
            .to_envelope_xdr_base64()
            .context("failed to encode envelope")?
    );
    Ok(())
}

fn print_version() {
    println!("meridian-tool {}", env!("CARGO_PKG_VERSION"));
    println!("rustc         {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
