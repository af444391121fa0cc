//! Append-only XDR output buffer.

use super::{XdrCodec, XdrError, XdrResult};

/// Growable buffer that appends XDR-encoded values.
///
/// Fixed-width writes are infallible. Anything carrying a schema maximum
/// (variable opaque data, strings, arrays) returns [`XdrError::LengthExceeded`]
/// instead of emitting bytes the network would refuse.
#[derive(Debug, Default, Clone)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(u32::from(value));
    }

    /// Writes `opaque[N]`: the raw bytes followed by zero padding.
    pub fn write_fixed_opaque(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        self.pad(data.len());
    }

    /// Writes `opaque<max>`: a u32 length, the bytes, then zero padding.
    pub fn write_var_opaque(&mut self, data: &[u8], max: usize) -> XdrResult<()> {
        self.write_len(data.len(), max)?;
        self.write_fixed_opaque(data);
        Ok(())
    }

    /// Writes `string<max>`. Same layout as variable opaque data.
    pub fn write_string(&mut self, value: &str, max: usize) -> XdrResult<()> {
        self.write_var_opaque(value.as_bytes(), max)
    }

    /// Writes `T*`: a presence flag and, when present, the value.
    pub fn write_optional<T: XdrCodec>(&mut self, value: Option<&T>) -> XdrResult<()> {
        match value {
            Some(inner) => {
                self.write_bool(true);
                inner.encode(self)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    /// Writes `T<max>`: a u32 count followed by each element in order.
    pub fn write_array<T: XdrCodec>(&mut self, items: &[T], max: usize) -> XdrResult<()> {
        self.write_len(items.len(), max)?;
        for item in items {
            item.encode(self)?;
        }
        Ok(())
    }

    fn write_len(&mut self, len: usize, max: usize) -> XdrResult<()> {
        if len > max {
            return Err(XdrError::LengthExceeded { len, max });
        }
        // max is always a schema constant well below u32::MAX
        self.write_u32(len as u32);
        Ok(())
    }

    fn pad(&mut self, len: usize) {
        let padding = (4 - len % 4) % 4;
        self.buf.extend(std::iter::repeat(0u8).take(padding));
    }
}
