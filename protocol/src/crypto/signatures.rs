//! # Envelope Signatures
//!
//! A transaction envelope carries an ordered list of [`DecoratedSignature`]s.
//! Each pairs the raw signature with a 4-byte hint so validators can pick
//! the matching signer without trying every key on the account.
//!
//! Two authorization modes produce entries:
//!
//! - **key signatures**: a [`Signer`] signs the 32-byte transaction hash;
//!   the hint is the last four bytes of the signer's public-key hash;
//! - **hash-x signatures**: a preimage is revealed as the "signature"; the
//!   hint is the last four bytes of `SHA-256(preimage)`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::hash::sha256;
use super::keys::{Keypair, PublicKey};
use crate::config::{MAX_SIGNATURE_LENGTH, PUBLIC_KEY_TYPE_ED25519, SIGNATURE_HINT_LENGTH};
use crate::xdr::{XdrCodec, XdrReader, XdrResult, XdrWriter};

// ---------------------------------------------------------------------------
// SignatureHint
// ---------------------------------------------------------------------------

/// The last four bytes of a signer's public-key hash (`opaque[4]`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureHint(#[serde(with = "hex::serde")] pub [u8; SIGNATURE_HINT_LENGTH]);

impl SignatureHint {
    /// Take the trailing four bytes of `bytes`. Shorter inputs are
    /// left-padded with zeros.
    pub fn from_tail(bytes: &[u8]) -> Self {
        let mut hint = [0u8; SIGNATURE_HINT_LENGTH];
        let take = bytes.len().min(SIGNATURE_HINT_LENGTH);
        hint[SIGNATURE_HINT_LENGTH - take..].copy_from_slice(&bytes[bytes.len() - take..]);
        Self(hint)
    }

    /// Hint for a hash-x signature over `preimage`.
    pub fn for_preimage(preimage: &[u8]) -> Self {
        Self::from_tail(&sha256(preimage))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_HINT_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for SignatureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureHint({})", hex::encode(self.0))
    }
}

impl XdrCodec for SignatureHint {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_fixed_opaque(&self.0);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self(reader.read_fixed_opaque()?))
    }
}

// ---------------------------------------------------------------------------
// DecoratedSignature
// ---------------------------------------------------------------------------

/// One `(hint, signature)` entry of an envelope's signature list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    pub hint: SignatureHint,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

impl DecoratedSignature {
    pub fn new(hint: SignatureHint, signature: Vec<u8>) -> Self {
        Self { hint, signature }
    }

    /// Whether this entry could have been produced by `public_key`: the hint
    /// must match and the signature must verify over `tx_hash`.
    pub fn verify(&self, public_key: &PublicKey, tx_hash: &[u8; 32]) -> bool {
        self.hint == ed25519_hint(public_key) && public_key.verify(tx_hash, &self.signature)
    }

    /// Whether this entry is a hash-x signature whose preimage hashes to
    /// `expected_hash`.
    pub fn verify_preimage(&self, expected_hash: &[u8; 32]) -> bool {
        self.hint == SignatureHint::from_tail(expected_hash)
            && sha256(&self.signature) == *expected_hash
    }
}

impl XdrCodec for DecoratedSignature {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        self.hint.encode(writer)?;
        writer.write_var_opaque(&self.signature, MAX_SIGNATURE_LENGTH)
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        Ok(Self {
            hint: SignatureHint::decode(reader)?,
            signature: reader.read_var_opaque(MAX_SIGNATURE_LENGTH)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// Anything that can authorize a transaction hash.
///
/// Implemented for [`Keypair`]; hardware wallets and remote signing services
/// implement it too, since signing only ever sees the 32-byte hash.
pub trait Signer {
    /// Bytes whose trailing four form the signature hint.
    fn public_key_hash(&self) -> Vec<u8>;

    /// Produce a raw signature over the transaction hash.
    fn sign_hash(&self, hash: &[u8; 32]) -> Vec<u8>;

    fn signature_hint(&self) -> SignatureHint {
        SignatureHint::from_tail(&self.public_key_hash())
    }
}

impl Signer for Keypair {
    /// The XDR `PublicKey` encoding: the Ed25519 type tag, then the key.
    fn public_key_hash(&self) -> Vec<u8> {
        public_key_xdr(&self.public_key())
    }

    fn sign_hash(&self, hash: &[u8; 32]) -> Vec<u8> {
        self.sign(hash).to_vec()
    }
}

fn public_key_xdr(public_key: &PublicKey) -> Vec<u8> {
    let mut out = Vec::with_capacity(36);
    out.extend_from_slice(&PUBLIC_KEY_TYPE_ED25519.to_be_bytes());
    out.extend_from_slice(public_key.as_bytes());
    out
}

fn ed25519_hint(public_key: &PublicKey) -> SignatureHint {
    SignatureHint::from_tail(&public_key_xdr(public_key))
}
