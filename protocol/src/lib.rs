// Copyright (c) 2026 Meridian Contributors. MIT License.
// See LICENSE for details.

//! # Meridian Protocol: Transaction Envelopes
//!
//! Builds, canonically encodes, hashes and signs transactions for a
//! federated ledger, producing the byte-exact XDR envelopes validators
//! accept, and decodes such envelopes back into typed values.
//!
//! ## Architecture
//!
//! - **xdr**: the canonical big-endian codec every wire byte goes through.
//! - **crypto**: SHA-256, Ed25519 keys, decorated signatures and the
//!   `Signer` seam.
//! - **network**: passphrase-derived network ids that prefix every
//!   signature base.
//! - **account**: account ids, multiplexed accounts, sequence-number
//!   providers.
//! - **transaction**: transactions, fee bumps, builders, envelope dispatch.
//! - **config**: protocol constants and wire discriminants.
//! - **error**: the library error taxonomy.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meridian_protocol::account::{Account, AccountId};
//! use meridian_protocol::crypto::Keypair;
//! use meridian_protocol::network::Network;
//! use meridian_protocol::transaction::{Asset, Operation, Signable, TransactionBuilder};
//!
//! # fn main() -> meridian_protocol::Result<()> {
//! let keypair = Keypair::generate();
//! let mut account = Account::new(keypair.public_key(), 100);
//!
//! let mut tx = TransactionBuilder::new(&mut account, Network::testnet())
//!     .add_operation(Operation::payment(
//!         AccountId::from_bytes([7; 32]),
//!         Asset::Native,
//!         5_000_000,
//!     )?)
//!     .set_timeout(60)?
//!     .build()?;
//!
//! tx.sign(&keypair)?;
//! let envelope = tx.to_envelope_xdr_base64()?;
//! # let _ = envelope;
//! # Ok(()) }
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Bytes are the contract. Every encoder has a test pinning its layout.
//! 2. Hashing never fails silently: a codec error is an error, not an empty
//!    hash.
//! 3. A failed build has no side effects, sequence counters included.

pub mod account;
pub mod config;
pub mod crypto;
pub mod error;
pub mod network;
pub mod transaction;
pub mod xdr;

pub use error::{Error, Result};
