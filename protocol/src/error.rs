//! Error types for transaction construction, signing and envelope decoding.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::xdr::XdrError;

/// Library error type.
///
/// Every failure is reported to the immediate caller. Nothing here is retried
/// and no variant leaves a half-built transaction or an advanced sequence
/// counter behind.
#[derive(Debug, Error)]
pub enum Error {
    /// A value violates its documented domain (malformed time bounds,
    /// sub-minimum fee, fee bump below the inner per-operation rate).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Fee or sequence arithmetic left its integer range.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// A set-once builder field was set a second time.
    #[error("{0} has already been set")]
    AlreadySet(&'static str),

    /// A required builder field was never set before `build()`.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// `build()` was called on a builder holding no operations.
    #[error("transaction must contain at least one operation")]
    EmptyOperationList,

    /// An envelope was requested before any signature was attached.
    #[error("transaction envelope has no signatures")]
    Unsigned,

    /// The outer envelope discriminant names no supported envelope kind.
    #[error("unsupported envelope type {0}")]
    UnsupportedEnvelopeType(i32),

    /// The codec failed while producing bytes (signature base or envelope).
    #[error("encoding failure: {0}")]
    EncodingFailure(#[source] XdrError),

    /// Input bytes or base64 text could not be decoded.
    #[error("decode failure: {0}")]
    Decode(#[source] XdrError),

    /// Key material could not be parsed.
    #[error("key error: {0}")]
    Key(#[from] KeyError),
}

impl From<XdrError> for Error {
    /// Decode-path conversion. Encode paths map explicitly to
    /// [`Error::EncodingFailure`].
    fn from(err: XdrError) -> Self {
        match err {
            XdrError::UnsupportedEnvelopeType(tag) => Error::UnsupportedEnvelopeType(tag),
            other => Error::Decode(other),
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
