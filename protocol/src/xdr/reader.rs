//! Cursor over an XDR-encoded byte slice.

use super::{XdrCodec, XdrError, XdrResult};

/// Zero-copy reader over a borrowed buffer.
///
/// Fixed-width reads check bounds first and leave the position untouched on
/// failure. Length prefixes are validated against the schema maximum before
/// any allocation happens, so hostile input cannot request huge buffers.
pub struct XdrReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fails unless every byte of the input has been consumed.
    pub fn finish(&self) -> XdrResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(XdrError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, len: usize) -> XdrResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(XdrError::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> XdrResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> XdrResult<u32> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> XdrResult<i32> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> XdrResult<u64> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> XdrResult<i64> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> XdrResult<bool> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(XdrError::InvalidBool(other)),
        }
    }

    /// Reads `opaque[N]` including its padding.
    pub fn read_fixed_opaque<const N: usize>(&mut self) -> XdrResult<[u8; N]> {
        let out = self.take_array::<N>()?;
        self.skip_padding(N)?;
        Ok(out)
    }

    /// Reads `opaque<max>`.
    pub fn read_var_opaque(&mut self, max: usize) -> XdrResult<Vec<u8>> {
        let len = self.read_len(max)?;
        let bytes = self.take(len)?.to_vec();
        self.skip_padding(len)?;
        Ok(bytes)
    }

    /// Reads `string<max>`; the bytes must be valid UTF-8.
    pub fn read_string(&mut self, max: usize) -> XdrResult<String> {
        let bytes = self.read_var_opaque(max)?;
        String::from_utf8(bytes).map_err(|_| XdrError::InvalidUtf8)
    }

    /// Reads `T*`.
    pub fn read_optional<T: XdrCodec>(&mut self) -> XdrResult<Option<T>> {
        if self.read_bool()? {
            Ok(Some(T::decode(self)?))
        } else {
            Ok(None)
        }
    }

    /// Reads `T<max>`.
    pub fn read_array<T: XdrCodec>(&mut self, max: usize) -> XdrResult<Vec<T>> {
        let len = self.read_len(max)?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    fn read_len(&mut self, max: usize) -> XdrResult<usize> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(XdrError::LengthExceeded { len, max });
        }
        Ok(len)
    }

    fn skip_padding(&mut self, len: usize) -> XdrResult<()> {
        let padding = (4 - len % 4) % 4;
        if self.take(padding)?.iter().any(|b| *b != 0) {
            return Err(XdrError::NonZeroPadding);
        }
        Ok(())
    }
}
