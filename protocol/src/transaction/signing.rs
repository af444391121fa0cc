//! Transaction hashing and signing.
//!
//! Signing is separate from building because the key may not be available at
//! construction time (hardware wallet, remote signer, multi-party setups).
//! Everything that can be signed implements [`Signable`]: it knows its
//! network and its signature base, and it owns an append-only signature list.
//!
//! The signed message is always the 32-byte SHA-256 of the signature base,
//! never the base itself.

use tracing::debug;

use crate::config::{MAX_SIGNATURES, MAX_SIGNATURE_LENGTH};
use crate::crypto::hash::sha256;
use crate::crypto::signatures::{DecoratedSignature, SignatureHint, Signer};
use crate::error::{Error, Result};
use crate::network::Network;

/// A transaction that can be hashed and signed.
pub trait Signable {
    /// The network whose id prefixes the signature base.
    fn network(&self) -> &Network;

    /// The exact bytes whose SHA-256 is signed:
    /// `network_id ‖ envelope tag ‖ canonical body`.
    ///
    /// Codec failures surface as [`Error::EncodingFailure`]; there is no
    /// "empty" base.
    fn signature_base(&self) -> Result<Vec<u8>>;

    /// Signatures in the order they were added.
    fn signatures(&self) -> &[DecoratedSignature];

    /// Append a signature produced elsewhere. Fails with
    /// [`Error::InvalidArgument`] once the envelope holds the maximum of 20.
    fn add_signature(&mut self, signature: DecoratedSignature) -> Result<()>;

    /// The transaction hash: SHA-256 of the signature base. Doubles as the
    /// transaction's public identifier.
    fn hash(&self) -> Result<[u8; 32]> {
        Ok(sha256(&self.signature_base()?))
    }

    fn hash_hex(&self) -> Result<String> {
        Ok(hex::encode(self.hash()?))
    }

    /// Sign the transaction hash with `signer` and append the result.
    fn sign<S: Signer + ?Sized>(&mut self, signer: &S) -> Result<()> {
        let hash = self.hash()?;
        let signature = DecoratedSignature::new(signer.signature_hint(), signer.sign_hash(&hash));
        debug!(
            tx_hash = %hex::encode(hash),
            hint = %hex::encode(signature.hint.as_bytes()),
            "signed transaction"
        );
        self.add_signature(signature)
    }

    /// Append a hash-x signature: the preimage itself, hinted by the tail of
    /// its SHA-256. The preimage is limited to 64 bytes like any signature.
    fn sign_hash_x(&mut self, preimage: &[u8]) -> Result<()> {
        if preimage.len() > MAX_SIGNATURE_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "hash-x preimage is {} bytes, maximum is {}",
                preimage.len(),
                MAX_SIGNATURE_LENGTH
            )));
        }
        let signature =
            DecoratedSignature::new(SignatureHint::for_preimage(preimage), preimage.to_vec());
        debug!(
            hint = %hex::encode(signature.hint.as_bytes()),
            "added hash-x signature"
        );
        self.add_signature(signature)
    }
}

/// Shared append for [`Signable::add_signature`] implementations.
pub(crate) fn append_signature(
    signatures: &mut Vec<DecoratedSignature>,
    signature: DecoratedSignature,
) -> Result<()> {
    if signatures.len() >= MAX_SIGNATURES {
        return Err(Error::InvalidArgument(format!(
            "an envelope carries at most {} signatures",
            MAX_SIGNATURES
        )));
    }
    if signature.signature.len() > MAX_SIGNATURE_LENGTH {
        return Err(Error::InvalidArgument(format!(
            "signature is {} bytes, maximum is {}",
            signature.signature.len(),
            MAX_SIGNATURE_LENGTH
        )));
    }
    signatures.push(signature);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
