//! Value types shared by transactions and operations.
//!
//! Small, mostly `Copy` types: the envelope discriminant, memos and assets.
//! Each owns its own XDR codec.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::account::AccountId;
use crate::config::{
    ENVELOPE_TYPE_TX, ENVELOPE_TYPE_TX_FEE_BUMP, ENVELOPE_TYPE_TX_V0, MAX_MEMO_TEXT_LENGTH,
    MEMO_HASH, MEMO_ID, MEMO_NONE, MEMO_RETURN, MEMO_TEXT,
};
use crate::error::{Error, Result};
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

// ---------------------------------------------------------------------------
// EnvelopeType
// ---------------------------------------------------------------------------

/// The envelope kinds a transaction can travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvelopeType {
    /// Legacy envelope: bare Ed25519 source key.
    TxV0,
    /// Current envelope: multiplexed source account.
    Tx,
    /// Fee-bump envelope around a `Tx` envelope.
    TxFeeBump,
}

impl EnvelopeType {
    pub fn discriminant(self) -> i32 {
        match self {
            Self::TxV0 => ENVELOPE_TYPE_TX_V0,
            Self::Tx => ENVELOPE_TYPE_TX,
            Self::TxFeeBump => ENVELOPE_TYPE_TX_FEE_BUMP,
        }
    }

    pub fn from_discriminant(value: i32) -> Option<Self> {
        match value {
            ENVELOPE_TYPE_TX_V0 => Some(Self::TxV0),
            ENVELOPE_TYPE_TX => Some(Self::Tx),
            ENVELOPE_TYPE_TX_FEE_BUMP => Some(Self::TxFeeBump),
            _ => None,
        }
    }
}

impl fmt::Display for EnvelopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TxV0 => write!(f, "ENVELOPE_TYPE_TX_V0"),
            Self::Tx => write!(f, "ENVELOPE_TYPE_TX"),
            Self::TxFeeBump => write!(f, "ENVELOPE_TYPE_TX_FEE_BUMP"),
        }
    }
}

impl XdrCodec for EnvelopeType {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_i32(self.discriminant());
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        let value = reader.read_i32()?;
        Self::from_discriminant(value).ok_or(XdrError::UnsupportedEnvelopeType(value))
    }
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// Free-form annotation attached to a transaction. Defaults to no memo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Memo {
    #[default]
    None,
    /// Up to 28 bytes of UTF-8 text.
    Text(String),
    Id(u64),
    Hash(#[serde(with = "hex::serde")] [u8; 32]),
    /// Hash of the transaction this one refunds.
    Return(#[serde(with = "hex::serde")] [u8; 32]),
}

impl Memo {
    /// Build a text memo, rejecting text longer than 28 bytes.
    pub fn text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.len() > MAX_MEMO_TEXT_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "memo text is {} bytes, maximum is {}",
                text.len(),
                MAX_MEMO_TEXT_LENGTH
            )));
        }
        Ok(Self::Text(text))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl XdrCodec for Memo {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::None => writer.write_i32(MEMO_NONE),
            Self::Text(text) => {
                writer.write_i32(MEMO_TEXT);
                writer.write_string(text, MAX_MEMO_TEXT_LENGTH)?;
            }
            Self::Id(id) => {
                writer.write_i32(MEMO_ID);
                writer.write_u64(*id);
            }
            Self::Hash(hash) => {
                writer.write_i32(MEMO_HASH);
                writer.write_fixed_opaque(hash);
            }
            Self::Return(hash) => {
                writer.write_i32(MEMO_RETURN);
                writer.write_fixed_opaque(hash);
            }
        }
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        match reader.read_i32()? {
            MEMO_NONE => Ok(Self::None),
            MEMO_TEXT => Ok(Self::Text(reader.read_string(MAX_MEMO_TEXT_LENGTH)?)),
            MEMO_ID => Ok(Self::Id(reader.read_u64()?)),
            MEMO_HASH => Ok(Self::Hash(reader.read_fixed_opaque()?)),
            MEMO_RETURN => Ok(Self::Return(reader.read_fixed_opaque()?)),
            value => Err(XdrError::UnknownDiscriminant {
                type_name: "MemoType",
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

const ASSET_TYPE_NATIVE: i32 = 0;
const ASSET_TYPE_CREDIT_ALPHANUM4: i32 = 1;
const ASSET_TYPE_CREDIT_ALPHANUM12: i32 = 2;

/// The native lumen or an issued credit asset.
///
/// Asset codes are stored zero-padded to their fixed wire width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Native,
    CreditAlphanum4 {
        #[serde(with = "hex::serde")]
        code: [u8; 4],
        issuer: AccountId,
    },
    CreditAlphanum12 {
        #[serde(with = "hex::serde")]
        code: [u8; 12],
        issuer: AccountId,
    },
}

impl Asset {
    /// Build an issued asset. Codes of 1-4 characters become alphanum-4,
    /// 5-12 become alphanum-12; anything else, or non-alphanumeric ASCII, is
    /// rejected.
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self> {
        if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::InvalidArgument(format!(
                "asset code {:?} must be ASCII alphanumeric",
                code
            )));
        }
        match code.len() {
            1..=4 => {
                let mut padded = [0u8; 4];
                padded[..code.len()].copy_from_slice(code.as_bytes());
                Ok(Self::CreditAlphanum4 {
                    code: padded,
                    issuer,
                })
            }
            5..=12 => {
                let mut padded = [0u8; 12];
                padded[..code.len()].copy_from_slice(code.as_bytes());
                Ok(Self::CreditAlphanum12 {
                    code: padded,
                    issuer,
                })
            }
            len => Err(Error::InvalidArgument(format!(
                "asset code must be 1-12 characters, got {}",
                len
            ))),
        }
    }

    /// The asset code without padding, or `"native"`.
    pub fn code(&self) -> String {
        let raw: &[u8] = match self {
            Self::Native => return "native".to_string(),
            Self::CreditAlphanum4 { code, .. } => code,
            Self::CreditAlphanum12 { code, .. } => code,
        };
        raw.iter()
            .take_while(|b| **b != 0)
            .map(|b| *b as char)
            .collect()
    }
}

impl XdrCodec for Asset {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        match self {
            Self::Native => writer.write_i32(ASSET_TYPE_NATIVE),
            Self::CreditAlphanum4 { code, issuer } => {
                writer.write_i32(ASSET_TYPE_CREDIT_ALPHANUM4);
                writer.write_fixed_opaque(code);
                issuer.encode(writer)?;
            }
            Self::CreditAlphanum12 { code, issuer } => {
                writer.write_i32(ASSET_TYPE_CREDIT_ALPHANUM12);
                writer.write_fixed_opaque(code);
                issuer.encode(writer)?;
            }
        }
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        match reader.read_i32()? {
            ASSET_TYPE_NATIVE => Ok(Self::Native),
            ASSET_TYPE_CREDIT_ALPHANUM4 => Ok(Self::CreditAlphanum4 {
                code: reader.read_fixed_opaque()?,
                issuer: AccountId::decode(reader)?,
            }),
            ASSET_TYPE_CREDIT_ALPHANUM12 => Ok(Self::CreditAlphanum12 {
                code: reader.read_fixed_opaque()?,
                issuer: AccountId::decode(reader)?,
            }),
            value => Err(XdrError::UnknownDiscriminant {
                type_name: "AssetType",
                value,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::XdrCodecExt;

    #[test]
    fn envelope_type_display() {
        assert_eq!(EnvelopeType::Tx.to_string(), "ENVELOPE_TYPE_TX");
        assert_eq!(EnvelopeType::TxFeeBump.discriminant(), 5);
    }

    #[test]
    fn unknown_envelope_type_is_unsupported() {
        assert!(matches!(
            EnvelopeType::from_xdr_bytes(&[0, 0, 0, 1]),
            Err(XdrError::UnsupportedEnvelopeType(1))
        ));
    }

    #[test]
    fn memo_defaults_to_none() {
        assert!(Memo::default().is_none());
        assert_eq!(Memo::None.to_xdr_bytes().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn memo_text_limit_enforced_on_construction() {
        assert!(Memo::text("a".repeat(28)).is_ok());
        assert!(matches!(
            Memo::text("a".repeat(29)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn memo_text_limit_enforced_on_encode() {
        // Bypassing the constructor still cannot produce an invalid envelope.
        let memo = Memo::Text("a".repeat(29));
        assert!(matches!(
            memo.to_xdr_bytes(),
            Err(XdrError::LengthExceeded { len: 29, max: 28 })
        ));
    }

    #[test]
    fn memo_text_wire_layout() {
        let bytes = Memo::text("hi").unwrap().to_xdr_bytes().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 1, 0, 0, 0, 2, b'h', b'i', 0, 0]);
    }

    #[test]
    fn asset_code_selects_width() {
        let issuer = AccountId::from_bytes([3; 32]);
        assert!(matches!(
            Asset::credit("USD", issuer).unwrap(),
            Asset::CreditAlphanum4 { .. }
        ));
        assert!(matches!(
            Asset::credit("LONGCODE", issuer).unwrap(),
            Asset::CreditAlphanum12 { .. }
        ));
        assert!(Asset::credit("", issuer).is_err());
        assert!(Asset::credit("THIRTEENCHARS", issuer).is_err());
        assert!(Asset::credit("US$", issuer).is_err());
    }

    #[test]
    fn asset_code_strips_padding() {
        let issuer = AccountId::from_bytes([3; 32]);
        assert_eq!(Asset::credit("EUR", issuer).unwrap().code(), "EUR");
        assert_eq!(Asset::Native.code(), "native");
    }

    #[test]
    fn memo_json_roundtrip() {
        let memo = Memo::Hash([0xAB; 32]);
        let json = serde_json::to_string(&memo).unwrap();
        let recovered: Memo = serde_json::from_str(&json).unwrap();
        assert_eq!(memo, recovered);
    }
}
