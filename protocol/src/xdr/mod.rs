//! # Canonical XDR Encoding
//!
//! Every byte that goes on the wire, and every byte that gets hashed for a
//! signature, passes through this module. The format is RFC 4506 XDR as the
//! ledger uses it:
//!
//! - all integers big-endian, 4 or 8 bytes wide;
//! - booleans are 4-byte integers restricted to 0 or 1;
//! - fixed opaque data is padded with zero bytes to a 4-byte boundary;
//! - variable opaque data, strings and arrays carry a u32 length prefix and
//!   a schema-defined maximum;
//! - optional values are a boolean followed by the value when present;
//! - unions are an `i32` discriminant followed by the selected arm.
//!
//! Types implement [`XdrCodec`]; [`XdrCodecExt`] adds whole-buffer and base64
//! helpers on top. Decoding a whole buffer is strict: trailing bytes and
//! non-zero padding are errors, so `decode(encode(x)) == x` and every accepted
//! buffer has exactly one encoding.

pub mod reader;
pub mod writer;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

pub use reader::XdrReader;
pub use writer::XdrWriter;

/// Errors raised by the XDR codec.
#[derive(Debug, Error)]
pub enum XdrError {
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("length {len} exceeds the schema maximum of {max}")]
    LengthExceeded { len: usize, max: usize },

    #[error("invalid boolean value {0}")]
    InvalidBool(u32),

    #[error("non-zero padding byte")]
    NonZeroPadding,

    #[error("unknown {type_name} discriminant {value}")]
    UnknownDiscriminant { type_name: &'static str, value: i32 },

    #[error("unsupported envelope type {0}")]
    UnsupportedEnvelopeType(i32),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("{0} trailing bytes after the encoded value")]
    TrailingBytes(usize),

    #[error("value cannot be represented: {0}")]
    Unrepresentable(&'static str),

    #[error("invalid {0}")]
    Invalid(&'static str),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result alias for codec operations.
pub type XdrResult<T> = std::result::Result<T, XdrError>;

/// A value with a canonical XDR representation.
pub trait XdrCodec: Sized {
    /// Appends the canonical encoding of `self` to the writer.
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()>;

    /// Reads one value from the current reader position.
    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self>;
}

/// Whole-buffer helpers for every [`XdrCodec`].
pub trait XdrCodecExt: XdrCodec {
    /// Encodes the value into a fresh buffer.
    fn to_xdr_bytes(&self) -> XdrResult<Vec<u8>> {
        let mut writer = XdrWriter::new();
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Decodes a value that must span the entire buffer.
    fn from_xdr_bytes(data: &[u8]) -> XdrResult<Self> {
        let mut reader = XdrReader::new(data);
        let value = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }

    /// Encodes the value and wraps it in standard (padded) base64.
    fn to_xdr_base64(&self) -> XdrResult<String> {
        Ok(BASE64.encode(self.to_xdr_bytes()?))
    }

    /// Decodes a standard base64 string and then the value inside it.
    /// Surrounding whitespace is ignored.
    fn from_xdr_base64(encoded: &str) -> XdrResult<Self> {
        let bytes = BASE64.decode(encoded.trim())?;
        Self::from_xdr_bytes(&bytes)
    }
}

impl<T: XdrCodec> XdrCodecExt for T {}

// ---------------------------------------------------------------------------
// Primitive impls
// ---------------------------------------------------------------------------

impl XdrCodec for u32 {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_u32(*self);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        reader.read_u32()
    }
}

impl XdrCodec for i32 {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_i32(*self);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        reader.read_i32()
    }
}

impl XdrCodec for u64 {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_u64(*self);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        reader.read_u64()
    }
}

impl XdrCodec for i64 {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_i64(*self);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        reader.read_i64()
    }
}

impl<const N: usize> XdrCodec for [u8; N] {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_fixed_opaque(self);
        Ok(())
    }

    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        reader.read_fixed_opaque::<N>()
    }
}
