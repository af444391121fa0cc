//! # Operations
//!
//! A transaction carries an ordered list of [`Operation`]s. Each has an
//! optional source account (defaulting to the transaction's source) and a
//! typed body. Only the operation kinds below are modelled; decoding any
//! other operation type fails with an unknown-discriminant error.

use serde::{Deserialize, Serialize};

use super::types::Asset;
use crate::account::{AccountId, MuxedAccount};
use crate::config::{MAX_DATA_NAME_LENGTH, MAX_DATA_VALUE_LENGTH};
use crate::error::{Error, Result};
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

const CREATE_ACCOUNT: i32 = 0;
const PAYMENT: i32 = 1;
const ACCOUNT_MERGE: i32 = 8;
const INFLATION: i32 = 9;
const MANAGE_DATA: i32 = 10;
const BUMP_SEQUENCE: i32 = 11;

/// The payload of an operation, one arm per operation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationBody {
    CreateAccount {
        destination: AccountId,
        starting_balance: i64,
    },
    Payment {
        destination: MuxedAccount,
        asset: Asset,
        amount: i64,
    },
    AccountMerge {
        destination: MuxedAccount,
    },
    Inflation,
    /// Sets (`Some`) or deletes (`None`) a named data entry.
    ManageData {
        name: String,
        #[serde(with = "hex_option")]
        value: Option<Vec<u8>>,
    },
    BumpSequence {
        bump_to: i64,
    },
}

impl OperationBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CreateAccount { .. } => "create_account",
            Self::Payment { .. } => "payment",
            Self::AccountMerge { .. } => "account_merge",
            Self::Inflation => "inflation",
            Self::ManageData { .. } => "manage_data",
            Self::BumpSequence { .. } => "bump_sequence",
        }
    }

    fn discriminant(&self) -> i32 {
        match self {
            Self::CreateAccount { .. } => CREATE_ACCOUNT,
            Self::Payment { .. } => PAYMENT,
            Self::AccountMerge { .. } => ACCOUNT_MERGE,
            Self::Inflation => INFLATION,
            Self::ManageData { .. } => MANAGE_DATA,
            Self::BumpSequence { .. } => BUMP_SEQUENCE,
        }
    }
}

/// One step of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub source_account: Option<MuxedAccount>,
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Self {
            source_account: None,
            body,
        }
    }

    /// Run this operation on behalf of `source` instead of the transaction's
    /// source account.
    pub fn with_source(mut self, source: impl Into<MuxedAccount>) -> Self {
        self.source_account = Some(source.into());
        self
    }

    /// Fund a new account. `starting_balance` must be positive.
    pub fn create_account(destination: AccountId, starting_balance: i64) -> Result<Self> {
        positive("starting_balance", starting_balance)?;
        Ok(Self::new(OperationBody::CreateAccount {
            destination,
            starting_balance,
        }))
    }

    /// Send `amount` of `asset`. `amount` must be positive.
    pub fn payment(destination: impl Into<MuxedAccount>, asset: Asset, amount: i64) -> Result<Self> {
        positive("amount", amount)?;
        Ok(Self::new(OperationBody::Payment {
            destination: destination.into(),
            asset,
            amount,
        }))
    }

    pub fn account_merge(destination: impl Into<MuxedAccount>) -> Self {
        Self::new(OperationBody::AccountMerge {
            destination: destination.into(),
        })
    }

    pub fn inflation() -> Self {
        Self::new(OperationBody::Inflation)
    }

    /// Set or clear a data entry. The name must be 1 to 64 bytes, the value
    /// at most 64 bytes.
    pub fn manage_data(name: impl Into<String>, value: Option<Vec<u8>>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_DATA_NAME_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "data name must be 1-{} bytes, got {}",
                MAX_DATA_NAME_LENGTH,
                name.len()
            )));
        }
        if let Some(v) = &value {
            if v.len() > MAX_DATA_VALUE_LENGTH {
                return Err(Error::InvalidArgument(format!(
                    "data value must be at most {} bytes, got {}",
                    MAX_DATA_VALUE_LENGTH,
                    v.len()
                )));
            }
        }
        Ok(Self::new(OperationBody::ManageData { name, value }))
    }

    pub fn bump_sequence(bump_to: i64) -> Result<Self> {
        if bump_to < 0 {
            return Err(Error::InvalidArgument(format!(
                "bump_to must be non-negative, got {}",
                bump_to
            )));
        }
        Ok(Self::new(OperationBody::BumpSequence { bump_to }))
    }
}

fn positive(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(Error::InvalidArgument(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// XDR
// ---------------------------------------------------------------------------

impl XdrCodec for Operation {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_optional(self.source_account.as_ref())?;
        writer.write_i32(self.body.discriminant());
        match &self.body {
            OperationBody::CreateAccount {
                destination,
                starting_balance,
            } => {
                destination.encode(writer)?;
                writer.write_i64(*starting_balance);
            }
            OperationBody::Payment {
                destination,
                asset,
                amount,
            } => {
                destination.encode(writer)?;
                asset.encode(writer)?;
                writer.write_i64(*amount);
            }
            OperationBody::AccountMerge { destination } => destination.encode(writer)?,
            OperationBody::Inflation => {}
            OperationBody::ManageData { name, value } => {
                writer.write_string(name, MAX_DATA_NAME_LENGTH)?;
                match value {
                    Some(v) => {
                        writer.write_bool(true);
                        writer.write_var_opaque(v, MAX_DATA_VALUE_LENGTH)?;
                    }
                    None => writer.write_bool(false),
                }
            }
            OperationBody::BumpSequence { bump_to } => writer.write_i64(*bump_to),
        }
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        let source_account = reader.read_optional::<MuxedAccount>()?;
        let body = match reader.read_i32()? {
            CREATE_ACCOUNT => OperationBody::CreateAccount {
                destination: AccountId::decode(reader)?,
                starting_balance: reader.read_i64()?,
            },
            PAYMENT => OperationBody::Payment {
                destination: MuxedAccount::decode(reader)?,
                asset: Asset::decode(reader)?,
                amount: reader.read_i64()?,
            },
            ACCOUNT_MERGE => OperationBody::AccountMerge {
                destination: MuxedAccount::decode(reader)?,
            },
            INFLATION => OperationBody::Inflation,
            MANAGE_DATA => {
                let name = reader.read_string(MAX_DATA_NAME_LENGTH)?;
                let value = if reader.read_bool()? {
                    Some(reader.read_var_opaque(MAX_DATA_VALUE_LENGTH)?)
                } else {
                    None
                };
                OperationBody::ManageData { name, value }
            }
            BUMP_SEQUENCE => OperationBody::BumpSequence {
                bump_to: reader.read_i64()?,
            },
            value => {
                return Err(XdrError::UnknownDiscriminant {
                    type_name: "OperationType",
                    value,
                })
            }
        };
        Ok(Self {
            source_account,
            body,
        })
    }
}

mod hex_option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&hex::encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
