//! # Transaction Module
//!
//! Construction, canonical encoding, hashing and signing of ledger
//! transactions, and decoding of the envelopes they travel in.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — EnvelopeType, Memo, Asset
//! time_bounds.rs  — Validity window
//! operation.rs    — Operation and its payloads
//! envelope.rs     — Wire structs, the TransactionEnvelope union, AbstractTransaction
//! tx.rs           — Transaction: v0/v1 codecs and signature base
//! fee_bump.rs     — FeeBumpTransaction and its builder
//! builder.rs      — TransactionBuilder bound to a sequence-number account
//! signing.rs      — Signable: hash, sign, hash-x
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] validates the operations and consumes
//!    one sequence number from the source account.
//! 2. **Sign**: [`Signable::sign`] appends a signature over the transaction
//!    hash; repeat per signer.
//! 3. **Serialize**: [`Transaction::to_envelope_xdr_base64`] produces the
//!    envelope handed to the transport layer.
//! 4. **Decode**: [`AbstractTransaction::from_envelope_xdr_base64`] turns any
//!    envelope back into a typed transaction.
//! 5. **Re-price** (optional): [`FeeBumpTransactionBuilder`] wraps a built
//!    transaction with a higher fee paid by another account.

pub mod builder;
pub mod envelope;
pub mod fee_bump;
pub mod operation;
pub mod signing;
pub mod time_bounds;
pub mod tx;
pub mod types;

pub use builder::TransactionBuilder;
pub use envelope::{
    AbstractTransaction, FeeBumpTransactionBody, FeeBumpTransactionEnvelope, TransactionEnvelope,
    TransactionV0, TransactionV0Envelope, TransactionV1, TransactionV1Envelope,
};
pub use fee_bump::{FeeBumpTransaction, FeeBumpTransactionBuilder};
pub use operation::{Operation, OperationBody};
pub use signing::Signable;
pub use time_bounds::TimeBounds;
pub use tx::Transaction;
pub use types::{Asset, EnvelopeType, Memo};
