//! The plain (non-fee-bump) transaction.

use serde::Serialize;
use tracing::debug;

use super::envelope::{
    TransactionEnvelope, TransactionV0, TransactionV0Envelope, TransactionV1,
    TransactionV1Envelope,
};
use super::operation::Operation;
use super::signing::{append_signature, Signable};
use super::time_bounds::TimeBounds;
use super::types::{EnvelopeType, Memo};
use crate::account::{AccountId, MuxedAccount};
use crate::crypto::signatures::DecoratedSignature;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::xdr::{XdrCodecExt, XdrError};

/// A transaction: source, fee, sequence number and an ordered, non-empty
/// list of operations, plus the signatures collected so far.
///
/// Built by [`TransactionBuilder`](super::TransactionBuilder) or decoded from
/// an envelope. Every field except the signature list is fixed once the
/// value exists; signatures can only be appended.
///
/// # Signature base
///
/// ```text
/// SHA-256(network_id) ‖ i32 ENVELOPE_TYPE_TX ‖ TransactionV1 XDR
/// ```
///
/// Legacy v0 transactions are hashed through the same v1 shape (their bare
/// source key becomes a plain Ed25519 muxed account), so a signature made
/// before an upgrade to v1 stays valid after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    source_account: MuxedAccount,
    fee: u32,
    sequence_number: i64,
    operations: Vec<Operation>,
    memo: Memo,
    time_bounds: Option<TimeBounds>,
    envelope_type: EnvelopeType,
    network: Network,
    signatures: Vec<DecoratedSignature>,
}

impl Transaction {
    /// Unsigned transaction from already-validated parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        source_account: MuxedAccount,
        fee: u32,
        sequence_number: i64,
        operations: Vec<Operation>,
        memo: Memo,
        time_bounds: Option<TimeBounds>,
        envelope_type: EnvelopeType,
        network: Network,
    ) -> Self {
        Self {
            source_account,
            fee,
            sequence_number,
            operations,
            memo,
            time_bounds,
            envelope_type,
            network,
            signatures: Vec::new(),
        }
    }

    pub fn source_account(&self) -> &MuxedAccount {
        &self.source_account
    }

    /// Maximum total fee, in stroops.
    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    /// `TxV0` or `Tx`: the envelope [`to_envelope_xdr`](Self::to_envelope_xdr)
    /// produces.
    pub fn envelope_type(&self) -> EnvelopeType {
        self.envelope_type
    }

    // -- wire shapes -------------------------------------------------------

    /// The v1 body.
    pub fn to_v1(&self) -> TransactionV1 {
        TransactionV1 {
            source_account: self.source_account,
            fee: self.fee,
            seq_num: self.sequence_number,
            time_bounds: self.time_bounds,
            memo: self.memo.clone(),
            operations: self.operations.clone(),
        }
    }

    /// The legacy v0 body. A multiplexed source has no v0 representation
    /// and fails with [`Error::EncodingFailure`].
    pub fn to_v0(&self) -> Result<TransactionV0> {
        let source = match self.source_account {
            MuxedAccount::Ed25519(account) => account,
            MuxedAccount::Muxed { .. } => {
                return Err(Error::EncodingFailure(XdrError::Unrepresentable(
                    "multiplexed source account in a v0 transaction",
                )))
            }
        };
        Ok(TransactionV0 {
            source_account_ed25519: *source.as_bytes(),
            fee: self.fee,
            seq_num: self.sequence_number,
            time_bounds: self.time_bounds,
            memo: self.memo.clone(),
            operations: self.operations.clone(),
        })
    }

    /// Canonical v1 body bytes.
    pub fn to_xdr(&self) -> Result<Vec<u8>> {
        self.to_v1().to_xdr_bytes().map_err(Error::EncodingFailure)
    }

    /// Canonical v0 body bytes.
    pub fn to_v0_xdr(&self) -> Result<Vec<u8>> {
        self.to_v0()?.to_xdr_bytes().map_err(Error::EncodingFailure)
    }

    /// The v1 envelope with the current signatures, which may be none.
    /// Fee bumps embed this.
    pub(crate) fn to_v1_envelope(&self) -> TransactionV1Envelope {
        TransactionV1Envelope {
            tx: self.to_v1(),
            signatures: self.signatures.clone(),
        }
    }

    /// The signed envelope. Fails with [`Error::Unsigned`] before the first
    /// signature.
    pub fn to_envelope(&self) -> Result<TransactionEnvelope> {
        if self.signatures.is_empty() {
            return Err(Error::Unsigned);
        }
        match self.envelope_type {
            EnvelopeType::TxV0 => Ok(TransactionEnvelope::TxV0(TransactionV0Envelope {
                tx: self.to_v0()?,
                signatures: self.signatures.clone(),
            })),
            _ => Ok(TransactionEnvelope::Tx(self.to_v1_envelope())),
        }
    }

    pub fn to_envelope_xdr(&self) -> Result<Vec<u8>> {
        self.to_envelope()?
            .to_xdr_bytes()
            .map_err(Error::EncodingFailure)
    }

    /// The signed envelope as base64, ready for submission.
    pub fn to_envelope_xdr_base64(&self) -> Result<String> {
        self.to_envelope()?
            .to_xdr_base64()
            .map_err(Error::EncodingFailure)
    }

    // -- decoding ----------------------------------------------------------

    /// Rebuild a transaction from a legacy envelope. Signatures are kept
    /// verbatim and in order.
    pub fn from_v0_envelope_xdr(envelope: TransactionV0Envelope, network: Network) -> Result<Self> {
        let tx = envelope.tx;
        Self::from_decoded(
            AccountId::from_bytes(tx.source_account_ed25519).into(),
            tx.fee,
            tx.seq_num,
            tx.operations,
            tx.memo,
            tx.time_bounds,
            EnvelopeType::TxV0,
            network,
            envelope.signatures,
        )
    }

    /// Rebuild a transaction from a v1 envelope. Signatures are kept
    /// verbatim and in order.
    pub fn from_v1_envelope_xdr(envelope: TransactionV1Envelope, network: Network) -> Result<Self> {
        let tx = envelope.tx;
        Self::from_decoded(
            tx.source_account,
            tx.fee,
            tx.seq_num,
            tx.operations,
            tx.memo,
            tx.time_bounds,
            EnvelopeType::Tx,
            network,
            envelope.signatures,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn from_decoded(
        source_account: MuxedAccount,
        fee: u32,
        sequence_number: i64,
        operations: Vec<Operation>,
        memo: Memo,
        time_bounds: Option<TimeBounds>,
        envelope_type: EnvelopeType,
        network: Network,
        signatures: Vec<DecoratedSignature>,
    ) -> Result<Self> {
        if operations.is_empty() {
            return Err(Error::EmptyOperationList);
        }
        let mut tx = Self::from_parts(
            source_account,
            fee,
            sequence_number,
            operations,
            memo,
            time_bounds,
            envelope_type,
            network,
        );
        tx.signatures = signatures;
        Ok(tx)
    }

    /// The same transaction in the v1 shape. Signatures carry over unchanged
    /// because both shapes share one signature base.
    pub(crate) fn into_v1(mut self) -> Self {
        if self.envelope_type == EnvelopeType::TxV0 {
            debug!(seq = self.sequence_number, "upgrading v0 transaction to v1");
            self.envelope_type = EnvelopeType::Tx;
        }
        self
    }
}

impl Signable for Transaction {
    fn network(&self) -> &Network {
        &self.network
    }

    fn signature_base(&self) -> Result<Vec<u8>> {
        let body = self.to_xdr()?;
        let mut base = Vec::with_capacity(32 + 4 + body.len());
        base.extend_from_slice(&self.network.network_id());
        base.extend_from_slice(&EnvelopeType::Tx.discriminant().to_be_bytes());
        base.extend_from_slice(&body);
        Ok(base)
    }

    fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    fn add_signature(&mut self, signature: DecoratedSignature) -> Result<()> {
        append_signature(&mut self.signatures, signature)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
