//! # Accounts
//!
//! Account identifiers as they appear on the wire, plus the sequence-number
//! provider that [`TransactionBuilder`](crate::transaction::TransactionBuilder)
//! draws from.
//!
//! - [`AccountId`] is the XDR `PublicKey` union: an Ed25519 key behind a
//!   4-byte type tag.
//! - [`MuxedAccount`] can additionally carry a 64-bit sub-account id. Current
//!   (v1) envelopes encode sources and destinations this way; legacy v0
//!   envelopes only understand the bare key.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{KEY_TYPE_ED25519, KEY_TYPE_MUXED_ED25519, PUBLIC_KEY_TYPE_ED25519};
use crate::crypto::keys::PublicKey;
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A plain ledger account: one Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(#[serde(with = "hex::serde")] [u8; 32]);

impl AccountId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.0)
    }
}

impl From<PublicKey> for AccountId {
    fn from(pk: PublicKey) -> Self {
        Self(*pk.as_bytes())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", &hex::encode(self.0)[..16])
    }
}

impl XdrCodec for AccountId {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_i32(PUBLIC_KEY_TYPE_ED25519);
        writer.write_fixed_opaque(&self.0);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        match reader.read_i32()? {
            PUBLIC_KEY_TYPE_ED25519 => Ok(Self(reader.read_fixed_opaque()?)),
            value => Err(XdrError::UnknownDiscriminant {
                type_name: "PublicKeyType",
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MuxedAccount
// ---------------------------------------------------------------------------

/// An account optionally qualified by a 64-bit sub-account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuxedAccount {
    Ed25519(AccountId),
    Muxed { id: u64, account: AccountId },
}

impl MuxedAccount {
    /// The underlying account, with any sub-account id stripped.
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::Ed25519(account) | Self::Muxed { account, .. } => *account,
        }
    }

    /// The sub-account id, if this is a multiplexed account.
    pub fn muxed_id(&self) -> Option<u64> {
        match self {
            Self::Ed25519(_) => None,
            Self::Muxed { id, .. } => Some(*id),
        }
    }

    pub fn is_muxed(&self) -> bool {
        matches!(self, Self::Muxed { .. })
    }
}

impl From<AccountId> for MuxedAccount {
    fn from(account: AccountId) -> Self {
        Self::Ed25519(account)
    }
}

impl From<PublicKey> for MuxedAccount {
    fn from(pk: PublicKey) -> Self {
        Self::Ed25519(pk.into())
    }
}

impl fmt::Display for MuxedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(account) => write!(f, "{}", account),
            Self::Muxed { id, account } => write!(f, "{}:{}", account, id),
        }
    }
}

impl XdrCodec for MuxedAccount {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Ed25519(account) => {
                writer.write_i32(KEY_TYPE_ED25519);
                writer.write_fixed_opaque(account.as_bytes());
            }
            Self::Muxed { id, account } => {
                writer.write_i32(KEY_TYPE_MUXED_ED25519);
                writer.write_u64(*id);
                writer.write_fixed_opaque(account.as_bytes());
            }
        }
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        match reader.read_i32()? {
            KEY_TYPE_ED25519 => Ok(Self::Ed25519(AccountId(reader.read_fixed_opaque()?))),
            KEY_TYPE_MUXED_ED25519 => {
                let id = reader.read_u64()?;
                let account = AccountId(reader.read_fixed_opaque()?);
                Ok(Self::Muxed { id, account })
            }
            value => Err(XdrError::UnknownDiscriminant {
                type_name: "CryptoKeyType",
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence numbers
// ---------------------------------------------------------------------------

/// Source of the account id and sequence counter a builder consumes.
///
/// The builder reads [`incremented_sequence_number`] for the new
/// transaction and calls [`increment_sequence_number`] only after the
/// transaction was constructed. Two builders must not draw from the same
/// account concurrently; the `&mut` borrow the builder holds enforces that
/// for a single account object.
///
/// [`incremented_sequence_number`]: SequenceAccount::incremented_sequence_number
/// [`increment_sequence_number`]: SequenceAccount::increment_sequence_number
pub trait SequenceAccount {
    fn account_id(&self) -> MuxedAccount;

    /// The last sequence number consumed on the ledger.
    fn sequence_number(&self) -> i64;

    /// The number the next transaction will carry, or `None` on overflow.
    fn incremented_sequence_number(&self) -> Option<i64> {
        self.sequence_number().checked_add(1)
    }

    /// Record that the next sequence number has been consumed.
    fn increment_sequence_number(&mut self);
}

/// In-memory account snapshot, typically seeded from a ledger query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    account_id: MuxedAccount,
    sequence_number: i64,
}

impl Account {
    pub fn new(account_id: impl Into<MuxedAccount>, sequence_number: i64) -> Self {
        Self {
            account_id: account_id.into(),
            sequence_number,
        }
    }
}

impl SequenceAccount for Account {
    fn account_id(&self) -> MuxedAccount {
        self.account_id
    }

    fn sequence_number(&self) -> i64 {
        self.sequence_number
    }

    /// Saturates at `i64::MAX`; builders check
    /// [`SequenceAccount::incremented_sequence_number`] first.
    fn increment_sequence_number(&mut self) {
        self.sequence_number = self.sequence_number.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::XdrCodecExt;

    fn account() -> AccountId {
        AccountId::from_bytes([0x11; 32])
    }

    #[test]
    fn account_id_wire_layout() {
        let bytes = account().to_xdr_bytes().unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..], &[0x11; 32]);
    }

    #[test]
    fn muxed_account_wire_layout() {
        let muxed = MuxedAccount::Muxed {
            id: 0x0102,
            account: account(),
        };
        let bytes = muxed.to_xdr_bytes().unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 1, 0]);
        assert_eq!(&bytes[4..12], &[0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(bytes.len(), 44);
        assert_eq!(MuxedAccount::from_xdr_bytes(&bytes).unwrap(), muxed);
    }

    #[test]
    fn plain_muxed_account_matches_account_id_bytes() {
        let plain: MuxedAccount = account().into();
        assert_eq!(
            plain.to_xdr_bytes().unwrap(),
            account().to_xdr_bytes().unwrap()
        );
    }

    #[test]
    fn unknown_key_type_is_rejected() {
        let mut bytes = vec![0, 0, 0, 9];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            MuxedAccount::from_xdr_bytes(&bytes),
            Err(XdrError::UnknownDiscriminant { value: 9, .. })
        ));
    }

    #[test]
    fn muxed_account_strips_to_account_id() {
        let muxed = MuxedAccount::Muxed {
            id: 7,
            account: account(),
        };
        assert_eq!(muxed.account_id(), account());
        assert_eq!(muxed.muxed_id(), Some(7));
        assert!(muxed.is_muxed());
    }

    #[test]
    fn account_increments_sequence() {
        let mut acct = Account::new(account(), 41);
        assert_eq!(acct.incremented_sequence_number(), Some(42));
        acct.increment_sequence_number();
        assert_eq!(acct.sequence_number(), 42);
    }

    #[test]
    fn increment_saturates_at_max() {
        let mut acct = Account::new(account(), i64::MAX);
        acct.increment_sequence_number();
        assert_eq!(acct.sequence_number(), i64::MAX);
    }

    #[test]
    fn incremented_sequence_detects_overflow() {
        let acct = Account::new(account(), i64::MAX);
        assert_eq!(acct.incremented_sequence_number(), None);
    }
}
