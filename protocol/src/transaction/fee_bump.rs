//! # Fee-Bump Transactions
//!
//! A fee bump re-prices an already-built transaction: a (possibly different)
//! fee account pays a higher fee, while the inner transaction, including its
//! operations and signatures, travels unchanged.
//!
//! Only v1-shaped transactions can be wrapped. The builder upgrades a legacy
//! v0 transaction on construction; since both shapes share one signature
//! base, the inner signatures stay valid.
//!
//! ## Fee rules
//!
//! With `n` inner operations the fee-bump transaction counts `n + 1`
//! operations, so the maximum fee is `base_fee × (n + 1)`. The base fee must
//! be at least [`MIN_BASE_FEE`] and at least the inner transaction's own
//! per-operation rate `inner.fee / n` (integer division).

use serde::Serialize;
use tracing::debug;

use super::envelope::{FeeBumpTransactionBody, FeeBumpTransactionEnvelope, TransactionEnvelope};
use super::signing::{append_signature, Signable};
use super::tx::Transaction;
use super::types::EnvelopeType;
use crate::account::MuxedAccount;
use crate::config::MIN_BASE_FEE;
use crate::crypto::signatures::DecoratedSignature;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::xdr::XdrCodecExt;

// ---------------------------------------------------------------------------
// FeeBumpTransaction
// ---------------------------------------------------------------------------

/// A v1 transaction wrapped with a new fee and fee-paying account.
///
/// Signature base:
///
/// ```text
/// SHA-256(network_id) ‖ i32 ENVELOPE_TYPE_TX_FEE_BUMP ‖ FeeBumpTransaction XDR
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeBumpTransaction {
    fee_account: MuxedAccount,
    fee: i64,
    inner: Transaction,
    network: Network,
    signatures: Vec<DecoratedSignature>,
}

impl FeeBumpTransaction {
    pub fn fee_account(&self) -> &MuxedAccount {
        &self.fee_account
    }

    /// Maximum total fee the fee account pays, in stroops.
    pub fn fee(&self) -> i64 {
        self.fee
    }

    pub fn inner_transaction(&self) -> &Transaction {
        &self.inner
    }

    /// The wire body, embedding the inner v1 envelope with its signatures.
    pub fn to_body(&self) -> FeeBumpTransactionBody {
        FeeBumpTransactionBody {
            fee_source: self.fee_account,
            fee: self.fee,
            inner_tx: self.inner.to_v1_envelope(),
        }
    }

    /// Canonical body bytes.
    pub fn to_xdr(&self) -> Result<Vec<u8>> {
        self.to_body().to_xdr_bytes().map_err(Error::EncodingFailure)
    }

    /// The signed envelope. Fails with [`Error::Unsigned`] before the first
    /// outer signature.
    pub fn to_envelope(&self) -> Result<TransactionEnvelope> {
        if self.signatures.is_empty() {
            return Err(Error::Unsigned);
        }
        Ok(TransactionEnvelope::TxFeeBump(FeeBumpTransactionEnvelope {
            tx: self.to_body(),
            signatures: self.signatures.clone(),
        }))
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

    /// Rebuild from a fee-bump envelope. Outer and inner signatures are kept
    /// verbatim and in order.
    pub fn from_fee_bump_envelope_xdr(
        envelope: FeeBumpTransactionEnvelope,
        network: Network,
    ) -> Result<Self> {
        let body = envelope.tx;
        let inner = Transaction::from_v1_envelope_xdr(body.inner_tx, network.clone())?;
        Ok(Self {
            fee_account: body.fee_source,
            fee: body.fee,
            inner,
            network,
            signatures: envelope.signatures,
        })
    }
}

impl Signable for FeeBumpTransaction {
    fn network(&self) -> &Network {
        &self.network
    }

    fn signature_base(&self) -> Result<Vec<u8>> {
        let body = self.to_xdr()?;
        let mut base = Vec::with_capacity(32 + 4 + body.len());
        base.extend_from_slice(&self.network.network_id());
        base.extend_from_slice(&EnvelopeType::TxFeeBump.discriminant().to_be_bytes());
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
// FeeBumpTransactionBuilder
// ---------------------------------------------------------------------------

/// Consuming builder for [`FeeBumpTransaction`].
///
/// Both the base fee and the fee account must be set exactly once.
///
/// ```rust,no_run
/// # use meridian_protocol::transaction::{FeeBumpTransactionBuilder, Transaction};
/// # use meridian_protocol::account::AccountId;
/// # fn demo(inner: Transaction, payer: AccountId) -> meridian_protocol::Result<()> {
/// let fee_bump = FeeBumpTransactionBuilder::new(inner)
///     .set_base_fee(200)?
///     .set_fee_account(payer)?
///     .build()?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct FeeBumpTransactionBuilder {
    inner: Transaction,
    base_fee: Option<i64>,
    max_fee: Option<i64>,
    fee_account: Option<MuxedAccount>,
}

impl FeeBumpTransactionBuilder {
    /// Start a fee bump around `inner`, upgrading a v0 transaction to v1.
    pub fn new(inner: Transaction) -> Self {
        Self {
            inner: inner.into_v1(),
            base_fee: None,
            max_fee: None,
            fee_account: None,
        }
    }

    /// Set the per-operation base fee and derive the maximum fee.
    ///
    /// Errors: [`Error::AlreadySet`] on a second call,
    /// [`Error::InvalidArgument`] below [`MIN_BASE_FEE`] or below the inner
    /// per-operation fee, [`Error::Overflow`] when the maximum fee leaves
    /// the `i64` range.
    pub fn set_base_fee(mut self, base_fee: i64) -> Result<Self> {
        if self.base_fee.is_some() {
            return Err(Error::AlreadySet("base fee"));
        }
        if base_fee < i64::from(MIN_BASE_FEE) {
            return Err(Error::InvalidArgument(format!(
                "base fee {} is below the minimum of {}",
                base_fee, MIN_BASE_FEE
            )));
        }

        let ops = self.inner.operations().len() as i64;
        let inner_per_op = rounded_per_op_fee(i64::from(self.inner.fee()), ops);
        if base_fee < inner_per_op {
            return Err(Error::InvalidArgument(format!(
                "base fee {} is below the inner transaction's per-operation fee of {}",
                base_fee, inner_per_op
            )));
        }

        let max_fee = base_fee
            .checked_mul(ops + 1)
            .ok_or_else(|| Error::Overflow(format!("{} × {} operations", base_fee, ops + 1)))?;

        self.base_fee = Some(base_fee);
        self.max_fee = Some(max_fee);
        Ok(self)
    }

    /// Set the account that pays the fee.
    pub fn set_fee_account(mut self, fee_account: impl Into<MuxedAccount>) -> Result<Self> {
        if self.fee_account.is_some() {
            return Err(Error::AlreadySet("fee account"));
        }
        self.fee_account = Some(fee_account.into());
        Ok(self)
    }

    /// `base_fee × (inner operations + 1)`, once the base fee is set.
    pub fn max_fee(&self) -> Option<i64> {
        self.max_fee
    }

    pub fn build(self) -> Result<FeeBumpTransaction> {
        let fee = self.max_fee.ok_or(Error::MissingField("base fee"))?;
        let fee_account = self.fee_account.ok_or(Error::MissingField("fee account"))?;
        let network = self.inner.network().clone();

        debug!(
            fee,
            fee_account = %fee_account,
            inner_seq = self.inner.sequence_number(),
            "built fee-bump transaction"
        );

        Ok(FeeBumpTransaction {
            fee_account,
            fee,
            inner: self.inner,
            network,
            signatures: Vec::new(),
        })
    }
}

/// `fee / ops` rounded half up, treating an empty operation list as one.
/// `fee` comes from a `u32`, so doubling it cannot overflow.
fn rounded_per_op_fee(fee: i64, ops: i64) -> i64 {
    let ops = ops.max(1);
    (2 * fee + ops) / (2 * ops)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::crypto::keys::Keypair;
    use crate::transaction::envelope::AbstractTransaction;
    use crate::transaction::operation::Operation;
    use crate::transaction::types::{Asset, Memo};

    fn inner(fee: u32, op_count: usize, envelope_type: EnvelopeType) -> Transaction {
        let op =
            Operation::payment(AccountId::from_bytes([0x22; 32]), Asset::Native, 10_000_000)
                .unwrap();
        Transaction::from_parts(
            AccountId::from_bytes([0x11; 32]).into(),
            fee,
            2,
            vec![op; op_count],
            Memo::None,
            None,
            envelope_type,
            Network::testnet(),
        )
    }

    fn payer() -> AccountId {
        AccountId::from_bytes([0x33; 32])
    }

    #[test]
    fn base_fee_below_inner_rate_rejected() {
        let builder = FeeBumpTransactionBuilder::new(inner(300, 3, EnvelopeType::Tx));
        assert!(matches!(
            builder.set_base_fee(50),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn max_fee_counts_the_extra_operation() {
        let builder = FeeBumpTransactionBuilder::new(inner(300, 3, EnvelopeType::Tx))
            .set_base_fee(100)
            .unwrap();
        assert_eq!(builder.max_fee(), Some(400));
        let fee_bump = builder.set_fee_account(payer()).unwrap().build().unwrap();
        assert_eq!(fee_bump.fee(), 400);
    }

    #[test]
    fn base_fee_below_minimum_rejected() {
        let builder = FeeBumpTransactionBuilder::new(inner(50, 1, EnvelopeType::Tx));
        assert!(matches!(
            builder.set_base_fee(99),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn per_op_fee_rounds_half_up() {
        assert_eq!(rounded_per_op_fee(300, 3), 100);
        assert_eq!(rounded_per_op_fee(350, 3), 117);
        assert_eq!(rounded_per_op_fee(340, 3), 113);
        assert_eq!(rounded_per_op_fee(5, 2), 3);
        assert_eq!(rounded_per_op_fee(100, 0), 100);
    }

    #[test]
    fn inner_rate_is_rounded() {
        // 350 / 3 = 116.67, rounds to 117
        let builder = FeeBumpTransactionBuilder::new(inner(350, 3, EnvelopeType::Tx));
        assert!(matches!(
            builder.set_base_fee(116),
            Err(Error::InvalidArgument(_))
        ));
        let builder = FeeBumpTransactionBuilder::new(inner(350, 3, EnvelopeType::Tx));
        assert!(builder.set_base_fee(117).is_ok());
    }

    #[test]
    fn max_fee_overflow_detected() {
        let builder = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx));
        assert!(matches!(
            builder.set_base_fee(i64::MAX / 2 + 1),
            Err(Error::Overflow(_))
        ));
    }

    #[test]
    fn fields_are_set_once() {
        let builder = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx))
            .set_base_fee(100)
            .unwrap();
        assert!(matches!(
            builder.set_base_fee(200),
            Err(Error::AlreadySet("base fee"))
        ));

        let builder = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx))
            .set_fee_account(payer())
            .unwrap();
        assert!(matches!(
            builder.set_fee_account(payer()),
            Err(Error::AlreadySet("fee account"))
        ));
    }

    #[test]
    fn build_requires_both_fields() {
        let missing_fee = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx))
            .set_fee_account(payer())
            .unwrap()
            .build();
        assert!(matches!(missing_fee, Err(Error::MissingField("base fee"))));

        let missing_account = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx))
            .set_base_fee(100)
            .unwrap()
            .build();
        assert!(matches!(
            missing_account,
            Err(Error::MissingField("fee account"))
        ));
    }

    #[test]
    fn hash_matches_known_vector() {
        let fee_bump = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx))
            .set_base_fee(100)
            .unwrap()
            .set_fee_account(payer())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(fee_bump.fee(), 200);
        assert_eq!(
            fee_bump.hash_hex().unwrap(),
            "654d21c54a5262194ecd8401ba5ccd0e5ab8c1b6d7d942ca1e7966b27338eca9"
        );
    }

    #[test]
    fn v0_inner_is_upgraded_with_signatures() {
        let kp = Keypair::generate();
        let mut v0 = inner(100, 1, EnvelopeType::TxV0);
        v0.sign(&kp).unwrap();
        let inner_hash = v0.hash().unwrap();
        let inner_sigs = v0.signatures().to_vec();

        let fee_bump = FeeBumpTransactionBuilder::new(v0)
            .set_base_fee(100)
            .unwrap()
            .set_fee_account(payer())
            .unwrap()
            .build()
            .unwrap();

        let wrapped = fee_bump.inner_transaction();
        assert_eq!(wrapped.envelope_type(), EnvelopeType::Tx);
        assert_eq!(wrapped.hash().unwrap(), inner_hash);
        assert_eq!(wrapped.signatures(), inner_sigs.as_slice());
    }

    #[test]
    fn outer_hash_differs_from_inner() {
        let fee_bump = FeeBumpTransactionBuilder::new(inner(100, 1, EnvelopeType::Tx))
            .set_base_fee(100)
            .unwrap()
            .set_fee_account(payer())
            .unwrap()
            .build()
            .unwrap();
        assert_ne!(
            fee_bump.hash().unwrap(),
            fee_bump.inner_transaction().hash().unwrap()
        );
        assert_eq!(&fee_bump.signature_base().unwrap()[32..36], &[0, 0, 0, 5]);
    }

    #[test]
    fn unsigned_fee_bump_refused_then_roundtrips() {
        let payer_key = Keypair::generate();
        let inner_key = Keypair::generate();
        let mut tx = inner(300, 3, EnvelopeType::Tx);
        tx.sign(&inner_key).unwrap();

        let mut fee_bump = FeeBumpTransactionBuilder::new(tx)
            .set_base_fee(150)
            .unwrap()
            .set_fee_account(payer_key.public_key())
            .unwrap()
            .build()
            .unwrap();
        assert!(matches!(fee_bump.to_envelope_xdr(), Err(Error::Unsigned)));

        fee_bump.sign(&payer_key).unwrap();
        let encoded = fee_bump.to_envelope_xdr_base64().unwrap();
        let decoded =
            AbstractTransaction::from_envelope_xdr_base64(&encoded, Network::testnet()).unwrap();
        assert_eq!(decoded, AbstractTransaction::FeeBump(fee_bump));
    }
}
