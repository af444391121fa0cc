//! # Cryptographic Primitives
//!
//! The ledger's authorization story is short: SHA-256 for every hash and
//! Ed25519 for every key signature. This module wraps the audited crates
//! (`sha2`, `ed25519-dalek`) behind the handful of types the transaction code
//! needs. Nothing here rolls its own crypto.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, sha256_hex};
pub use keys::{KeyError, Keypair, PublicKey};
pub use signatures::{DecoratedSignature, SignatureHint, Signer};
