//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] enforces a disciplined construction flow: bind
//! it to a source account, add operations (and optionally a memo and time
//! bounds), call `.build()`, and get back an unsigned [`Transaction`].
//!
//! The builder does not sign; that happens through
//! [`Signable`](super::Signable). This separation keeps construction
//! testable without key material.
//!
//! # Sequence numbers
//!
//! `build()` gives the transaction the account's *next* sequence number and
//! advances the account's counter only after the transaction exists. A
//! failed build leaves the counter untouched, so each sequence number is
//! consumed exactly once per successfully built transaction.

use tracing::debug;

use super::operation::Operation;
use super::time_bounds::TimeBounds;
use super::tx::Transaction;
use super::types::{EnvelopeType, Memo};
use crate::account::SequenceAccount;
use crate::config::{MAX_OPERATIONS, MIN_BASE_FEE};
use crate::error::{Error, Result};
use crate::network::Network;

/// Consuming builder for [`Transaction`].
///
/// # Usage
///
/// ```rust,no_run
/// use meridian_protocol::account::{Account, AccountId};
/// use meridian_protocol::network::Network;
/// use meridian_protocol::transaction::{Asset, Memo, Operation, TransactionBuilder};
///
/// # fn demo() -> meridian_protocol::Result<()> {
/// let mut account = Account::new(AccountId::from_bytes([1; 32]), 41);
/// let tx = TransactionBuilder::new(&mut account, Network::testnet())
///     .add_operation(Operation::payment(
///         AccountId::from_bytes([2; 32]),
///         Asset::Native,
///         10_000_000,
///     )?)
///     .add_memo(Memo::text("rent")?)?
///     .set_timeout(300)?
///     .build()?;
/// assert_eq!(tx.sequence_number(), 42);
/// # Ok(()) }
/// ```
pub struct TransactionBuilder<'a, A: SequenceAccount + ?Sized> {
    account: &'a mut A,
    network: Network,
    operations: Vec<Operation>,
    memo: Option<Memo>,
    time_bounds: Option<TimeBounds>,
    base_fee: u32,
    envelope_type: EnvelopeType,
}

impl<'a, A: SequenceAccount + ?Sized> TransactionBuilder<'a, A> {
    /// Defaults:
    /// - base fee: [`MIN_BASE_FEE`] per operation
    /// - memo: none
    /// - time bounds: none
    /// - envelope: [`EnvelopeType::Tx`]
    pub fn new(account: &'a mut A, network: Network) -> Self {
        Self {
            account,
            network,
            operations: Vec::new(),
            memo: None,
            time_bounds: None,
            base_fee: MIN_BASE_FEE,
            envelope_type: EnvelopeType::Tx,
        }
    }

    /// Append an operation. Order is preserved and wire-significant.
    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn add_operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations.extend(operations);
        self
    }

    /// Attach the memo. A second memo fails with [`Error::AlreadySet`].
    pub fn add_memo(mut self, memo: Memo) -> Result<Self> {
        if self.memo.is_some() {
            return Err(Error::AlreadySet("memo"));
        }
        self.memo = Some(memo);
        Ok(self)
    }

    /// Attach time bounds. A second window fails with [`Error::AlreadySet`].
    pub fn add_time_bounds(mut self, time_bounds: TimeBounds) -> Result<Self> {
        if self.time_bounds.is_some() {
            return Err(Error::AlreadySet("time bounds"));
        }
        self.time_bounds = Some(time_bounds);
        Ok(self)
    }

    /// Time bounds closing `timeout_secs` from now.
    pub fn set_timeout(self, timeout_secs: i64) -> Result<Self> {
        let time_bounds = TimeBounds::expires_after(timeout_secs)?;
        self.add_time_bounds(time_bounds)
    }

    /// Per-operation fee; at least [`MIN_BASE_FEE`].
    pub fn set_base_fee(mut self, base_fee: u32) -> Result<Self> {
        if base_fee < MIN_BASE_FEE {
            return Err(Error::InvalidArgument(format!(
                "base fee {} is below the minimum of {}",
                base_fee, MIN_BASE_FEE
            )));
        }
        self.base_fee = base_fee;
        Ok(self)
    }

    /// Produce a legacy `TxV0` envelope instead of the default `Tx`.
    pub fn envelope_type(mut self, envelope_type: EnvelopeType) -> Result<Self> {
        if envelope_type == EnvelopeType::TxFeeBump {
            return Err(Error::InvalidArgument(
                "fee-bump transactions are built with FeeBumpTransactionBuilder".to_string(),
            ));
        }
        self.envelope_type = envelope_type;
        Ok(self)
    }

    /// Construct the transaction and consume one sequence number.
    ///
    /// Fails with [`Error::EmptyOperationList`] without operations,
    /// [`Error::InvalidArgument`] beyond 100 operations or for a multiplexed
    /// source in a v0 envelope, and [`Error::Overflow`] when the fee or the
    /// sequence number leaves its range. No failure advances the account.
    pub fn build(self) -> Result<Transaction> {
        if self.operations.is_empty() {
            return Err(Error::EmptyOperationList);
        }
        if self.operations.len() > MAX_OPERATIONS {
            return Err(Error::InvalidArgument(format!(
                "{} operations exceed the maximum of {}",
                self.operations.len(),
                MAX_OPERATIONS
            )));
        }

        let source_account = self.account.account_id();
        if self.envelope_type == EnvelopeType::TxV0 && source_account.is_muxed() {
            return Err(Error::InvalidArgument(
                "a v0 envelope cannot carry a multiplexed source account".to_string(),
            ));
        }

        let sequence_number = self
            .account
            .incremented_sequence_number()
            .ok_or_else(|| Error::Overflow("sequence number".to_string()))?;
        let fee = self
            .base_fee
            .checked_mul(self.operations.len() as u32)
            .ok_or_else(|| {
                Error::Overflow(format!(
                    "{} × {} operations",
                    self.base_fee,
                    self.operations.len()
                ))
            })?;

        let op_count = self.operations.len();
        let tx = Transaction::from_parts(
            source_account,
            fee,
            sequence_number,
            self.operations,
            self.memo.unwrap_or_default(),
            self.time_bounds,
            self.envelope_type,
            self.network,
        );
        self.account.increment_sequence_number();

        debug!(
            source = %source_account,
            seq = sequence_number,
            fee,
            operations = op_count,
            "built transaction"
        );

        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountId, MuxedAccount};
    use crate::transaction::types::Asset;

    fn account(seq: i64) -> Account {
        Account::new(AccountId::from_bytes([0x11; 32]), seq)
    }

    fn payment() -> Operation {
        Operation::payment(AccountId::from_bytes([0x22; 32]), Asset::Native, 1).unwrap()
    }

    #[test]
    fn empty_operation_list_rejected() {
        let mut acct = account(5);
        let result = TransactionBuilder::new(&mut acct, Network::testnet()).build();
        assert!(matches!(result, Err(Error::EmptyOperationList)));
        assert_eq!(acct.sequence_number(), 5, "failed build must not consume");
    }

    #[test]
    fn fee_is_operations_times_min_base_fee() {
        for n in [1usize, 3, 100] {
            let mut acct = account(0);
            let tx = TransactionBuilder::new(&mut acct, Network::testnet())
                .add_operations(std::iter::repeat(payment()).take(n))
                .build()
                .unwrap();
            assert_eq!(tx.fee(), n as u32 * 100);
        }
    }

    #[test]
    fn custom_base_fee() {
        let mut acct = account(0);
        let tx = TransactionBuilder::new(&mut acct, Network::testnet())
            .set_base_fee(250)
            .unwrap()
            .add_operation(payment())
            .add_operation(payment())
            .build()
            .unwrap();
        assert_eq!(tx.fee(), 500);

        assert!(matches!(
            TransactionBuilder::new(&mut acct, Network::testnet()).set_base_fee(99),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn successive_builds_consume_successive_sequence_numbers() {
        let mut acct = account(41);
        let first = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_operation(payment())
            .build()
            .unwrap();
        let second = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_operation(payment())
            .build()
            .unwrap();
        assert_eq!(first.sequence_number(), 42);
        assert_eq!(second.sequence_number(), 43);
        assert_eq!(acct.sequence_number(), 43);
    }

    #[test]
    fn memo_and_time_bounds_are_set_once() {
        let mut acct = account(0);
        let builder = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_memo(Memo::Id(1))
            .unwrap();
        assert!(matches!(
            builder.add_memo(Memo::Id(2)),
            Err(Error::AlreadySet("memo"))
        ));

        let builder = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_time_bounds(TimeBounds::new(0, 10).unwrap())
            .unwrap();
        assert!(matches!(
            builder.set_timeout(30),
            Err(Error::AlreadySet("time bounds"))
        ));
    }

    #[test]
    fn memo_defaults_to_none_and_bounds_to_absent() {
        let mut acct = account(0);
        let tx = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_operation(payment())
            .build()
            .unwrap();
        assert!(tx.memo().is_none());
        assert!(tx.time_bounds().is_none());
        assert_eq!(tx.envelope_type(), EnvelopeType::Tx);
    }

    #[test]
    fn too_many_operations_rejected_without_consuming() {
        let mut acct = account(7);
        let result = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_operations(std::iter::repeat(payment()).take(MAX_OPERATIONS + 1))
            .build();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(acct.sequence_number(), 7);
    }

    #[test]
    fn fee_overflow_rejected_without_consuming() {
        let mut acct = account(7);
        let result = TransactionBuilder::new(&mut acct, Network::testnet())
            .set_base_fee(u32::MAX)
            .unwrap()
            .add_operation(payment())
            .add_operation(payment())
            .build();
        assert!(matches!(result, Err(Error::Overflow(_))));
        assert_eq!(acct.sequence_number(), 7);
    }

    #[test]
    fn exhausted_sequence_rejected() {
        let mut acct = account(i64::MAX);
        let result = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_operation(payment())
            .build();
        assert!(matches!(result, Err(Error::Overflow(_))));
        assert_eq!(acct.sequence_number(), i64::MAX);
    }

    #[test]
    fn operation_order_is_preserved() {
        let mut acct = account(0);
        let ops = vec![
            Operation::bump_sequence(5).unwrap(),
            payment(),
            Operation::inflation(),
        ];
        let tx = TransactionBuilder::new(&mut acct, Network::testnet())
            .add_operations(ops.clone())
            .build()
            .unwrap();
        assert_eq!(tx.operations(), ops.as_slice());
    }

    #[test]
    fn v0_envelope_rejects_muxed_source() {
        let mut acct = Account::new(
            MuxedAccount::Muxed {
                id: 9,
                account: AccountId::from_bytes([0x11; 32]),
            },
            0,
        );
        let result = TransactionBuilder::new(&mut acct, Network::testnet())
            .envelope_type(EnvelopeType::TxV0)
            .unwrap()
            .add_operation(payment())
            .build();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(acct.sequence_number(), 0);
    }

    #[test]
    fn fee_bump_envelope_type_rejected() {
        let mut acct = account(0);
        assert!(TransactionBuilder::new(&mut acct, Network::testnet())
            .envelope_type(EnvelopeType::TxFeeBump)
            .is_err());
    }

    #[test]
    fn works_through_a_trait_object() {
        let mut acct = account(1);
        let dyn_acct: &mut dyn SequenceAccount = &mut acct;
        let tx = TransactionBuilder::new(dyn_acct, Network::testnet())
            .add_operation(payment())
            .build()
            .unwrap();
        assert_eq!(tx.sequence_number(), 2);
        assert_eq!(acct.sequence_number(), 2);
    }
}
