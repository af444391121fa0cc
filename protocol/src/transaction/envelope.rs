//! # Wire Envelopes
//!
//! The XDR structures that travel on the wire, one per envelope kind, and the
//! tagged union over them:
//!
//! ```text
//! TransactionEnvelope
//! ├── TxV0      (tag 0) TransactionV0Envelope       { TransactionV0, signatures<20> }
//! ├── Tx        (tag 2) TransactionV1Envelope       { TransactionV1, signatures<20> }
//! └── TxFeeBump (tag 5) FeeBumpTransactionEnvelope  { FeeBumpTransactionBody, signatures<20> }
//! ```
//!
//! These are plain data with public fields. The typed, invariant-holding
//! views are [`Transaction`] and [`FeeBumpTransaction`];
//! [`AbstractTransaction`] picks between them when decoding an arbitrary
//! envelope.

use serde::Serialize;
use tracing::debug;

use super::fee_bump::FeeBumpTransaction;
use super::operation::Operation;
use super::signing::Signable;
use super::time_bounds::TimeBounds;
use super::tx::Transaction;
use super::types::{EnvelopeType, Memo};
use crate::account::MuxedAccount;
use crate::config::{MAX_OPERATIONS, MAX_SIGNATURES};
use crate::crypto::signatures::DecoratedSignature;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::xdr::{XdrCodec, XdrCodecExt, XdrError, XdrReader, XdrResult, XdrWriter};

/// The reserved `ext` union of every body; only arm 0 exists.
fn write_ext(writer: &mut XdrWriter) {
    writer.write_i32(0);
}

fn read_ext(reader: &mut XdrReader<'_>) -> XdrResult<()> {
    match reader.read_i32()? {
        0 => Ok(()),
        value => Err(XdrError::UnknownDiscriminant {
            type_name: "ext",
            value,
        }),
    }
}

// ---------------------------------------------------------------------------
// Transaction bodies
// ---------------------------------------------------------------------------

/// Legacy body: the source is a bare Ed25519 key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionV0 {
    pub source_account_ed25519: [u8; 32],
    pub fee: u32,
    pub seq_num: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

impl XdrCodec for TransactionV0 {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_fixed_opaque(&self.source_account_ed25519);
        writer.write_u32(self.fee);
        writer.write_i64(self.seq_num);
        writer.write_optional(self.time_bounds.as_ref())?;
        self.memo.encode(writer)?;
        writer.write_array(&self.operations, MAX_OPERATIONS)?;
        write_ext(writer);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        let tx = Self {
            source_account_ed25519: reader.read_fixed_opaque()?,
            fee: reader.read_u32()?,
            seq_num: reader.read_i64()?,
            time_bounds: reader.read_optional()?,
            memo: Memo::decode(reader)?,
            operations: reader.read_array(MAX_OPERATIONS)?,
        };
        read_ext(reader)?;
        Ok(tx)
    }
}

/// Current body: the source is a multiplexed account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionV1 {
    pub source_account: MuxedAccount,
    pub fee: u32,
    pub seq_num: i64,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

impl XdrCodec for TransactionV1 {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        self.source_account.encode(writer)?;
        writer.write_u32(self.fee);
        writer.write_i64(self.seq_num);
        writer.write_optional(self.time_bounds.as_ref())?;
        self.memo.encode(writer)?;
        writer.write_array(&self.operations, MAX_OPERATIONS)?;
        write_ext(writer);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        let tx = Self {
            source_account: MuxedAccount::decode(reader)?,
            fee: reader.read_u32()?,
            seq_num: reader.read_i64()?,
            time_bounds: reader.read_optional()?,
            memo: Memo::decode(reader)?,
            operations: reader.read_array(MAX_OPERATIONS)?,
        };
        read_ext(reader)?;
        Ok(tx)
    }
}

/// Fee-bump body. The inner transaction is always a v1 envelope, carried
/// behind its own `ENVELOPE_TYPE_TX` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBumpTransactionBody {
    pub fee_source: MuxedAccount,
    pub fee: i64,
    pub inner_tx: TransactionV1Envelope,
}

impl XdrCodec for FeeBumpTransactionBody {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        self.fee_source.encode(writer)?;
        writer.write_i64(self.fee);
        EnvelopeType::Tx.encode(writer)?;
        self.inner_tx.encode(writer)?;
        write_ext(writer);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        let fee_source = MuxedAccount::decode(reader)?;
        let fee = reader.read_i64()?;
        let inner_tx = match reader.read_i32()? {
            tag if tag == EnvelopeType::Tx.discriminant() => TransactionV1Envelope::decode(reader)?,
            tag => return Err(XdrError::UnsupportedEnvelopeType(tag)),
        };
        read_ext(reader)?;
        Ok(Self {
            fee_source,
            fee,
            inner_tx,
        })
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionV0Envelope {
    pub tx: TransactionV0,
    pub signatures: Vec<DecoratedSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionV1Envelope {
    pub tx: TransactionV1,
    pub signatures: Vec<DecoratedSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBumpTransactionEnvelope {
    pub tx: FeeBumpTransactionBody,
    pub signatures: Vec<DecoratedSignature>,
}

macro_rules! impl_envelope_codec {
    ($envelope:ty, $body:ty) => {
        impl XdrCodec for $envelope {
            fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
                self.tx.encode(writer)?;
                writer.write_array(&self.signatures, MAX_SIGNATURES)
            }

            fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
                Ok(Self {
                    tx: <$body>::decode(reader)?,
                    signatures: reader.read_array(MAX_SIGNATURES)?,
                })
            }
        }
    };
}

impl_envelope_codec!(TransactionV0Envelope, TransactionV0);
impl_envelope_codec!(TransactionV1Envelope, TransactionV1);
impl_envelope_codec!(FeeBumpTransactionEnvelope, FeeBumpTransactionBody);

/// Any envelope, discriminated by its leading tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEnvelope {
    TxV0(TransactionV0Envelope),
    Tx(TransactionV1Envelope),
    TxFeeBump(FeeBumpTransactionEnvelope),
}

impl TransactionEnvelope {
    pub fn envelope_type(&self) -> EnvelopeType {
        match self {
            Self::TxV0(_) => EnvelopeType::TxV0,
            Self::Tx(_) => EnvelopeType::Tx,
            Self::TxFeeBump(_) => EnvelopeType::TxFeeBump,
        }
    }
}

impl XdrCodec for TransactionEnvelope {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        self.envelope_type().encode(writer)?;
        match self {
            Self::TxV0(env) => env.encode(writer),
            Self::Tx(env) => env.encode(writer),
            Self::TxFeeBump(env) => env.encode(writer),
        }
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        match EnvelopeType::decode(reader)? {
            EnvelopeType::TxV0 => Ok(Self::TxV0(TransactionV0Envelope::decode(reader)?)),
            EnvelopeType::Tx => Ok(Self::Tx(TransactionV1Envelope::decode(reader)?)),
            EnvelopeType::TxFeeBump => {
                Ok(Self::TxFeeBump(FeeBumpTransactionEnvelope::decode(reader)?))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AbstractTransaction
// ---------------------------------------------------------------------------

/// A decoded transaction of either shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractTransaction {
    Transaction(Transaction),
    FeeBump(FeeBumpTransaction),
}

impl AbstractTransaction {
    /// Reconstruct the typed transaction held by `envelope`.
    pub fn from_envelope(envelope: TransactionEnvelope, network: Network) -> Result<Self> {
        let tx = match envelope {
            TransactionEnvelope::TxV0(env) => {
                Self::Transaction(Transaction::from_v0_envelope_xdr(env, network)?)
            }
            TransactionEnvelope::Tx(env) => {
                Self::Transaction(Transaction::from_v1_envelope_xdr(env, network)?)
            }
            TransactionEnvelope::TxFeeBump(env) => {
                Self::FeeBump(FeeBumpTransaction::from_fee_bump_envelope_xdr(env, network)?)
            }
        };
        debug!(
            envelope_type = %tx.envelope_type(),
            signatures = tx.signatures().len(),
            "decoded transaction envelope"
        );
        Ok(tx)
    }

    /// Decode a binary envelope. Unknown tags fail with
    /// [`Error::UnsupportedEnvelopeType`]; any other malformation with
    /// [`Error::Decode`].
    pub fn from_envelope_xdr_bytes(bytes: &[u8], network: Network) -> Result<Self> {
        Self::from_envelope(TransactionEnvelope::from_xdr_bytes(bytes)?, network)
    }

    /// Decode a base64 envelope as exchanged with the network.
    pub fn from_envelope_xdr_base64(encoded: &str, network: Network) -> Result<Self> {
        Self::from_envelope(TransactionEnvelope::from_xdr_base64(encoded)?, network)
    }

    /// Alias of [`from_envelope_xdr_base64`](Self::from_envelope_xdr_base64).
    pub fn from_envelope_xdr(encoded: &str, network: Network) -> Result<Self> {
        Self::from_envelope_xdr_base64(encoded, network)
    }

    pub fn envelope_type(&self) -> EnvelopeType {
        match self {
            Self::Transaction(tx) => tx.envelope_type(),
            Self::FeeBump(_) => EnvelopeType::TxFeeBump,
        }
    }

    pub fn to_envelope(&self) -> Result<TransactionEnvelope> {
        match self {
            Self::Transaction(tx) => tx.to_envelope(),
            Self::FeeBump(tx) => tx.to_envelope(),
        }
    }

    pub fn to_envelope_xdr(&self) -> Result<Vec<u8>> {
        self.to_envelope()?
            .to_xdr_bytes()
            .map_err(Error::EncodingFailure)
    }

    pub fn to_envelope_xdr_base64(&self) -> Result<String> {
        self.to_envelope()?
            .to_xdr_base64()
            .map_err(Error::EncodingFailure)
    }
}

impl Signable for AbstractTransaction {
    fn network(&self) -> &Network {
        match self {
            Self::Transaction(tx) => tx.network(),
            Self::FeeBump(tx) => tx.network(),
        }
    }

    fn signature_base(&self) -> Result<Vec<u8>> {
        match self {
            Self::Transaction(tx) => tx.signature_base(),
            Self::FeeBump(tx) => tx.signature_base(),
        }
    }

    fn signatures(&self) -> &[DecoratedSignature] {
        match self {
            Self::Transaction(tx) => tx.signatures(),
            Self::FeeBump(tx) => tx.signatures(),
        }
    }

    fn add_signature(&mut self, signature: DecoratedSignature) -> Result<()> {
        match self {
            Self::Transaction(tx) => tx.add_signature(signature),
            Self::FeeBump(tx) => tx.add_signature(signature),
        }
    }
}

impl From<Transaction> for AbstractTransaction {
    fn from(tx: Transaction) -> Self {
        Self::Transaction(tx)
    }
}

impl From<FeeBumpTransaction> for AbstractTransaction {
    fn from(tx: FeeBumpTransaction) -> Self {
        Self::FeeBump(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1() -> TransactionV1 {
        TransactionV1 {
            source_account: crate::account::AccountId::from_bytes([0x11; 32]).into(),
            fee: 100,
            seq_num: 2,
            time_bounds: None,
            memo: Memo::None,
            operations: vec![Operation::inflation()],
        }
    }

    #[test]
    fn envelope_tag_leads_the_encoding() {
        let env = TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: v1(),
            signatures: vec![],
        });
        let bytes = env.to_xdr_bytes().unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
        assert_eq!(TransactionEnvelope::from_xdr_bytes(&bytes).unwrap(), env);
    }

    #[test]
    fn unknown_tags_are_unsupported() {
        for tag in [1i32, 3, 4, 6, -1] {
            let mut bytes = tag.to_be_bytes().to_vec();
            bytes.extend_from_slice(&[0u8; 64]);
            assert!(matches!(
                TransactionEnvelope::from_xdr_bytes(&bytes),
                Err(XdrError::UnsupportedEnvelopeType(t)) if t == tag
            ));
            assert!(matches!(
                AbstractTransaction::from_envelope_xdr_bytes(&bytes, Network::testnet()),
                Err(Error::UnsupportedEnvelopeType(t)) if t == tag
            ));
        }
    }

    #[test]
    fn nonzero_ext_rejected() {
        let mut bytes = v1().to_xdr_bytes().unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 1;
        assert!(matches!(
            TransactionV1::from_xdr_bytes(&bytes),
            Err(XdrError::UnknownDiscriminant { type_name: "ext", value: 1 })
        ));
    }

    #[test]
    fn fee_bump_inner_must_be_v1() {
        let body = FeeBumpTransactionBody {
            fee_source: crate::account::AccountId::from_bytes([0x33; 32]).into(),
            fee: 200,
            inner_tx: TransactionV1Envelope {
                tx: v1(),
                signatures: vec![],
            },
        };
        let mut bytes = body.to_xdr_bytes().unwrap();
        // fee source (36) + fee (8), then the inner tag
        bytes[36 + 8 + 3] = 0;
        assert!(matches!(
            FeeBumpTransactionBody::from_xdr_bytes(&bytes),
            Err(XdrError::UnsupportedEnvelopeType(0))
        ));
    }

    #[test]
    fn garbage_base64_is_a_decode_error() {
        assert!(matches!(
            AbstractTransaction::from_envelope_xdr_base64("%%%", Network::testnet()),
            Err(Error::Decode(XdrError::Base64(_)))
        ));
    }

    #[test]
    fn truncated_envelope_is_a_decode_error() {
        let env = TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: v1(),
            signatures: vec![],
        });
        let bytes = env.to_xdr_bytes().unwrap();
        assert!(matches!(
            AbstractTransaction::from_envelope_xdr_bytes(&bytes[..bytes.len() - 2], Network::testnet()),
            Err(Error::Decode(XdrError::UnexpectedEof { .. }))
        ));
    }
}
